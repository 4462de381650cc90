//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Fallback values for business settings missing from the settings table.
    #[serde(default)]
    pub business: BusinessDefaults,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Business defaults used when the settings table has no value for a key.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessDefaults {
    /// Markup applied to a parent company's price when a branch has none.
    #[serde(default = "default_profit_margin")]
    pub profit_margin_percent: Decimal,
    /// Stock level (in boxes) at or below which a product is reported as low.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: Decimal,
}

fn default_profit_margin() -> Decimal {
    Decimal::ZERO
}

fn default_low_stock_threshold() -> Decimal {
    Decimal::TEN
}

impl Default for BusinessDefaults {
    fn default() -> Self {
        Self {
            profit_margin_percent: default_profit_margin(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "mizan=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `MIZAN__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MIZAN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_business_defaults() {
        let defaults = BusinessDefaults::default();
        assert_eq!(defaults.profit_margin_percent, Decimal::ZERO);
        assert_eq!(defaults.low_stock_threshold, dec!(10));
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("MIZAN__DATABASE__URL", Some("sqlite::memory:")),
                ("MIZAN__BUSINESS__PROFIT_MARGIN_PERCENT", Some("12.5")),
                ("RUN_MODE", Some("test-does-not-exist")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.business.profit_margin_percent, dec!(12.5));
                assert_eq!(config.business.low_stock_threshold, dec!(10));
                assert_eq!(config.log.filter, "mizan=info");
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars(
            [
                ("MIZAN__DATABASE__URL", None::<&str>),
                ("RUN_MODE", Some("test-does-not-exist")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
