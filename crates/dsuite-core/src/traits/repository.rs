//! Generic repository trait for point data access.
//!
//! The trait is generic over the entity type and its key type so that an
//! entity keyed by an integer, a UUID, or a string gets the same surface
//! without a hard-coded key field name. Key extraction lives with the
//! entity definition, not here; a repository implementation looks keys up
//! however its persistence layer requires.
//!
//! Absent rows are `Option`/`bool` results, never errors. Every mutating
//! operation commits before returning; there is no batching across calls.
//! Callers that need multi-entity atomicity use the implementation's
//! escape hatch onto the raw persistence handle instead.

use async_trait::async_trait;

use crate::result::AppResult;

/// Generic CRUD repository contract, one instance per entity type.
#[async_trait]
pub trait Repository<Entity, Key>: Send + Sync
where
    Entity: Send + Sync,
    Key: Send + Sync,
{
    /// Find an entity by its key. `None` when no row matches.
    async fn get_by_id(&self, key: &Key) -> AppResult<Option<Entity>>;

    /// Insert a new entity and commit. Fails with a validation error
    /// before any I/O when the entity is not well-formed.
    async fn insert(&self, entity: &Entity) -> AppResult<()>;

    /// Overwrite all columns of an existing entity and commit. The whole
    /// row is written, not a change diff.
    async fn update(&self, entity: &Entity) -> AppResult<()>;

    /// Delete an entity by key. Returns `Ok(false)` when no row matched;
    /// a missing row is not an error.
    async fn delete(&self, key: &Key) -> AppResult<bool>;

    /// Count all rows for the entity type.
    async fn count(&self) -> AppResult<u64>;
}
