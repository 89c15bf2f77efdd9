//! OSPM LMSR Engine — Entry Point
//!
//! Wiring sequence:
//! 1. Parse the command line
//! 2. Load config.toml (when given) + validate
//! 3. Init tracing on stderr (JSON or compact, per config)
//! 4. Run the command and print its output on stdout

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use ospm_lmsr::cli::{self, Cli};
use ospm_lmsr::config::{self, AppConfig, LogFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── 1. Load configuration ───────────────────────────────
    let config = match &cli.config {
        Some(path) => config::loader::load_config(path).context("Failed to load configuration")?,
        None => AppConfig::default(),
    };

    // ── 2. Initialize logging ───────────────────────────────
    init_tracing(&config);

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        command = ?cli.command,
        "Starting"
    );

    // ── 3. Run ──────────────────────────────────────────────
    let output = cli::execute(&cli, &config)?;
    println!("{output}");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.app.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.app.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
