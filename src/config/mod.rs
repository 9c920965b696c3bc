//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RETAIL_PROMOTIONS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use retail_promotions::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let rules = config.rules.to_rules();
//! ```

mod database;
mod error;
mod logging;
mod rules;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use rules::RulesConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection; absent means in-memory storage
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Promotion validation bounds
    #[serde(default)]
    pub rules: RulesConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RETAIL_PROMOTIONS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RETAIL_PROMOTIONS__DATABASE__URL=...` -> `database.url = ...`
    /// - `RETAIL_PROMOTIONS__RULES__MIN_SPEND_FLOOR=75` -> `rules.min_spend_floor = 75`
    /// - `RETAIL_PROMOTIONS__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RETAIL_PROMOTIONS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.rules.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "RETAIL_PROMOTIONS__DATABASE__URL",
        "RETAIL_PROMOTIONS__DATABASE__MAX_CONNECTIONS",
        "RETAIL_PROMOTIONS__RULES__MIN_SPEND_FLOOR",
        "RETAIL_PROMOTIONS__RULES__PERCENTAGE_MAX",
        "RETAIL_PROMOTIONS__LOGGING__FORMAT",
        "RETAIL_PROMOTIONS__LOGGING__LEVEL",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.rules, RulesConfig::default());
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("RETAIL_PROMOTIONS__DATABASE__URL", "postgres://app@localhost/promos");
        env::set_var("RETAIL_PROMOTIONS__DATABASE__MAX_CONNECTIONS", "8");
        env::set_var("RETAIL_PROMOTIONS__RULES__MIN_SPEND_FLOOR", "75");
        env::set_var("RETAIL_PROMOTIONS__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let database = config.database.clone().unwrap();
        assert_eq!(database.url, "postgres://app@localhost/promos");
        assert_eq!(database.max_connections, 8);
        assert_eq!(config.rules.min_spend_floor, 75);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_reports_bad_rules() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("RETAIL_PROMOTIONS__RULES__PERCENTAGE_MAX", "150");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRule { rule: "percentage_max", .. })
        ));
    }
}
