//! Configuration Module - TOML-based Client Configuration
//!
//! Loads and validates configuration from `config.toml`. Every section
//! and field is optional; missing values take the defaults below, so an
//! empty file is a valid configuration.

pub mod loader;

use serde::Deserialize;

use crate::domain::format::NumberFormat;
use crate::domain::lmsr::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, LmsrEngine};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Process identity and logging.
  pub app: AppSection,
  /// Share-solve tuning.
  pub engine: EngineConfig,
  /// Display precision and paging.
  pub display: DisplayConfig,
  /// Trade panel rules.
  pub trade: TradeConfig,
}

/// Process identity and logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
  /// Human-readable name used in log lines.
  pub name: String,
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  pub log_level: String,
  /// Log line format.
  pub log_format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  /// Human-readable single-line output.
  #[default]
  Compact,
  /// Structured JSON lines.
  Json,
}

/// LMSR share-solve tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Relative stopping tolerance on the solved cost.
  pub tolerance: f64,
  /// Iteration budget before reporting non-convergence.
  pub max_iterations: u32,
}

/// Display precision and paging.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
  /// Decimal places for probabilities and quantities.
  pub decimals: u32,
  /// Markets fetched per page of the market list.
  pub page_size: u32,
}

/// Trade panel rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TradeConfig {
  /// Smallest spend accepted for submission.
  pub min_spend: f64,
  /// Largest spend accepted for submission.
  pub max_spend: f64,
  /// One-click spend amounts.
  pub presets: Vec<f64>,
  /// Spend field content when the panel opens.
  pub default_amount: String,
  /// Share drift (fraction of the previewed shares) above which the
  /// authoritative fill is logged as diverging from the preview.
  pub drift_warn_fraction: f64,
  /// Trades shown in the history list.
  pub history_limit: usize,
}

impl EngineConfig {
  /// Build the engine this configuration describes.
  pub fn engine(&self) -> LmsrEngine {
    LmsrEngine::new(self.tolerance, self.max_iterations)
  }
}

impl DisplayConfig {
  pub const fn number_format(&self) -> NumberFormat {
    NumberFormat::new(self.decimals)
  }
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: "ospm".to_string(),
      log_level: "info".to_string(),
      log_format: LogFormat::default(),
    }
  }
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      tolerance: DEFAULT_TOLERANCE,
      max_iterations: DEFAULT_MAX_ITERATIONS,
    }
  }
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self {
      decimals: 1,
      page_size: 20,
    }
  }
}

impl Default for TradeConfig {
  fn default() -> Self {
    Self {
      min_spend: 1.0,
      max_spend: 1000.0,
      presets: vec![5.0, 10.0, 25.0, 50.0, 100.0],
      default_amount: "10".to_string(),
      drift_warn_fraction: 0.01,
      history_limit: 20,
    }
  }
}
