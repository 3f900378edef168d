//! Application configuration schemas.
//!
//! Configuration is deserialized from TOML files via the `config` crate.
//! Three layers are merged, later layers winning: `config/default.toml`,
//! an environment overlay (`config/{env}.toml`), and environment variables
//! prefixed with `DSUITE__`. This mirrors the usual file → secret overlay
//! → environment precedence of layered application settings.

pub mod database;
pub mod logging;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use self::database::DatabaseConfig;
use self::logging::LoggingConfig;
use crate::error::AppError;
use crate::result::AppResult;

/// Root application configuration.
///
/// The top-level deserialization target for the merged TOML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Connection settings per logical database name.
    ///
    /// Repositories never read this map directly; the connection factory
    /// resolves a logical name (for example `"dsuite"` or `"school"`) to a
    /// live pool at startup.
    #[serde(default)]
    pub databases: HashMap<String, DatabaseConfig>,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the process environment.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// and `DSUITE__`-prefixed environment variables. Missing files are
    /// tolerated so that a bare checkout still starts with env-only
    /// settings.
    pub fn load(env: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DSUITE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Look up the connection settings for a logical database name.
    pub fn database(&self, name: &str) -> AppResult<&DatabaseConfig> {
        self.databases.get(name).ok_or_else(|| {
            AppError::configuration(format!("No connection configured for database '{name}'"))
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            databases: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_lookup_missing_name() {
        let config = AppConfig::default();
        let err = config.database("nope").unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_database_lookup_present() {
        let mut config = AppConfig::default();
        config.databases.insert(
            "dsuite".to_string(),
            DatabaseConfig::new("sqlite::memory:"),
        );
        assert_eq!(config.database("dsuite").unwrap().url, "sqlite::memory:");
    }
}
