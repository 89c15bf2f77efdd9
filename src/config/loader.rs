//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;

/// Largest supported display precision.
const MAX_DECIMALS: u32 = 6;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)
    .with_context(|| format!("Invalid configuration in {}", path.display()))?;

  info!(
    path = %path.display(),
    tolerance = config.engine.tolerance,
    max_iterations = config.engine.max_iterations,
    decimals = config.display.decimals,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
///
/// # Errors
/// Returns error on malformed TOML or failed validation.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse config TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - A usable share-solve tolerance and iteration budget
/// - A bounded display precision and a non-empty market page
/// - A consistent spend range, presets and drift threshold
fn validate_config(config: &AppConfig) -> Result<()> {
  // Engine validation
  anyhow::ensure!(
    config.engine.tolerance.is_finite()
      && config.engine.tolerance > 0.0
      && config.engine.tolerance < 1e-3,
    "engine.tolerance must be in (0, 1e-3), got {}",
    config.engine.tolerance
  );
  anyhow::ensure!(
    config.engine.max_iterations > 0,
    "engine.max_iterations must be positive"
  );

  // Display validation
  anyhow::ensure!(
    config.display.decimals <= MAX_DECIMALS,
    "display.decimals must be at most {MAX_DECIMALS}, got {}",
    config.display.decimals
  );
  anyhow::ensure!(
    config.display.page_size > 0,
    "display.page_size must be positive"
  );

  // Trade validation
  let trade = &config.trade;
  anyhow::ensure!(
    trade.min_spend.is_finite() && trade.min_spend > 0.0,
    "trade.min_spend must be positive, got {}",
    trade.min_spend
  );
  anyhow::ensure!(
    trade.max_spend.is_finite() && trade.max_spend >= trade.min_spend,
    "trade.max_spend must be at least min_spend ({}), got {}",
    trade.min_spend,
    trade.max_spend
  );
  for (i, preset) in trade.presets.iter().enumerate() {
    anyhow::ensure!(
      preset.is_finite() && *preset > 0.0,
      "trade.presets[{}] must be positive, got {}",
      i,
      preset
    );
  }
  anyhow::ensure!(
    (0.0..=1.0).contains(&trade.drift_warn_fraction),
    "trade.drift_warn_fraction must be in [0, 1], got {}",
    trade.drift_warn_fraction
  );
  anyhow::ensure!(
    trade.history_limit > 0,
    "trade.history_limit must be positive"
  );

  Ok(())
}
