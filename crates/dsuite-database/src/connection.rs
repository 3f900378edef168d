//! SQLite connection pool management.
//!
//! The [`ConnectionFactory`] is the one place that reads connection
//! configuration. It is built explicitly at startup from the merged
//! [`AppConfig`] — an explicit registration list, not a runtime scan —
//! and hands out a ready pool per logical database name. Repositories
//! and the query layer consume pools from here and never touch
//! configuration themselves.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use dsuite_core::config::database::DatabaseConfig;
use dsuite_core::config::AppConfig;
use dsuite_core::error::{AppError, ErrorKind};
use dsuite_core::result::AppResult;

/// Create a connection pool for one configured database.
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<SqlitePool> {
    info!(
        url = %config.url,
        max_connections = config.max_connections,
        "Connecting to SQLite"
    );

    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid database URL '{}'", config.url),
                e,
            )
        })?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_with(options)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to connect to database", e)
        })?;

    Ok(pool)
}

/// Registry of live pools keyed by logical database name.
///
/// One factory is built per process run; repositories clone pool handles
/// out of it. Cloned handles share the underlying pool, so a repository
/// and any other collaborator working against the same logical database
/// observe the same committed state.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    pools: HashMap<String, SqlitePool>,
}

impl ConnectionFactory {
    /// Connect every database named in the configuration.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let mut pools = HashMap::new();
        for (name, db_config) in &config.databases {
            let pool = create_pool(db_config).await?;
            info!(database = %name, "Registered database");
            pools.insert(name.clone(), pool);
        }
        Ok(Self { pools })
    }

    /// Build a factory from pools that are already connected. Used by
    /// tests that run against in-memory databases.
    pub fn from_pools(pools: HashMap<String, SqlitePool>) -> Self {
        Self { pools }
    }

    /// Look up the pool for a logical database name.
    pub fn pool(&self, name: &str) -> AppResult<&SqlitePool> {
        self.pools.get(name).ok_or_else(|| {
            AppError::configuration(format!("No database registered under '{name}'"))
        })
    }

    /// Names of all registered databases.
    pub fn database_names(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Close every pool.
    pub async fn close(&self) {
        for (name, pool) in &self.pools {
            pool.close().await;
            info!(database = %name, "Closed database pool");
        }
    }
}
