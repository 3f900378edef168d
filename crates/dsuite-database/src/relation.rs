//! Eager loading of navigation relations.
//!
//! A [`Relation`] knows how to populate one named reference on a batch
//! of already-fetched rows with a single additional query. The
//! repository applies each requested relation independently after the
//! base rows are realized, so loading can never change which rows the
//! base filter matched, and nothing is loaded transitively beyond what
//! the caller asked for.

use async_trait::async_trait;
use sqlx::SqlitePool;

use dsuite_core::result::AppResult;
use dsuite_entity::Entity;

/// Loader for one declared navigation relation of entity `E`.
#[async_trait]
pub trait Relation<E: Entity>: Send + Sync {
    /// The relation's name, for logging.
    fn name(&self) -> &'static str;

    /// Populate the relation on every row in the batch.
    async fn load(&self, pool: &SqlitePool, rows: &mut [E]) -> AppResult<()>;
}

/// Render an `IN` clause with one placeholder per key.
pub(crate) fn in_clause(column: &str, len: usize) -> String {
    let placeholders = vec!["?"; len].join(", ");
    format!("{column} IN ({placeholders})")
}
