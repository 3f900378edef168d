//! Entity metadata trait consumed by the generic data-access layer.

use serde::Serialize;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use validator::Validate;

/// Metadata binding one record type to one database table.
///
/// The generic repository and the deferred query builder are parametrized
/// by this trait instead of by a fixed key field name. An entity declares
/// where it lives (`TABLE`), how it is keyed (`KEY_COLUMN`, [`Self::Key`],
/// [`key()`](Entity::key)), and how its non-key columns are written
/// ([`DATA_COLUMNS`](Entity::DATA_COLUMNS) and
/// [`bind_data`](Entity::bind_data), which must agree on order).
pub trait Entity:
    for<'r> sqlx::FromRow<'r, SqliteRow>
    + Validate
    + Serialize
    + Unpin
    + Send
    + Sync
    + 'static
{
    /// Primary key type (integer, UUID, or string — anything the driver
    /// can bind).
    type Key: for<'q> sqlx::Encode<'q, Sqlite>
        + sqlx::Type<Sqlite>
        + Clone
        + std::fmt::Debug
        + Send
        + Sync
        + 'static;

    /// Table name.
    const TABLE: &'static str;

    /// Primary key column name.
    const KEY_COLUMN: &'static str;

    /// Whether the key is assigned by the database on insert. When true,
    /// the key column is omitted from `INSERT` statements and the driver
    /// reports the generated value.
    const KEY_GENERATED: bool;

    /// Writable non-key columns, in the order [`bind_data`](Entity::bind_data)
    /// binds them.
    const DATA_COLUMNS: &'static [&'static str];

    /// Extract the entity's key value.
    fn key(&self) -> Self::Key;

    /// Bind the values of [`DATA_COLUMNS`](Entity::DATA_COLUMNS) onto a
    /// query, in declaration order.
    fn bind_data<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>>;
}
