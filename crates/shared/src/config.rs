//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Reconciliation pipeline settings.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    /// Cube engine settings.
    #[serde(default)]
    pub cube: CubeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reconciliation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    /// Absolute tolerance used when comparing prices and amounts.
    #[serde(default = "default_amount_tolerance")]
    pub amount_tolerance: Decimal,
    /// Unit stamped on report quantities.
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: default_amount_tolerance(),
            unit: default_unit(),
        }
    }
}

fn default_amount_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_unit() -> String {
    "h".to_string()
}

/// Cube engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CubeConfig {
    /// Maximum breakdown depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

fn default_max_depth() -> usize {
    10
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "timebill=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TIMEBILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
