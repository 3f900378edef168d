//! Database connection configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for one logical database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://data/dsuite.db` or
    /// `sqlite::memory:`.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection acquire timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Create the database file if it does not exist yet.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    /// Create a configuration with defaults for everything but the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            create_if_missing: true,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
