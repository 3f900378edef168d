//! Generic SQL repository over one entity type.
//!
//! [`SqlRepository`] is the uniform data-access facade: one instance
//! binds one entity type to one connection pool for the repository's
//! lifetime. Key lookup, table name, and column binding all come from the
//! entity's [`Entity`] metadata, so no per-entity subclass is needed to
//! change the key field.
//!
//! Every mutating operation validates first (failing before any I/O),
//! commits before returning, and on persistence failure logs the error
//! and re-surfaces it as a typed [`AppError`] — never swallowed. Bulk
//! operations run inside a single transaction, so a failure anywhere in
//! the batch rejects the whole batch.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, error};
use validator::Validate;

use dsuite_core::error::{AppError, ErrorKind};
use dsuite_core::result::AppResult;
use dsuite_core::traits::Repository;
use dsuite_core::types::filter::FilterField;

use dsuite_entity::Entity;

use crate::query::SelectQuery;
use crate::relation::Relation;

/// Repository implementation backed by a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqlRepository<E: Entity> {
    pool: SqlitePool,
    _entity: PhantomData<E>,
}

impl<E: Entity> SqlRepository<E> {
    /// Bind a repository to a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// The underlying pool.
    ///
    /// Exposed deliberately: callers whose needs go beyond this surface
    /// (multi-repository transactions, raw SQL) work against the pool
    /// directly rather than waiting for the repository to grow an API.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// A deferred query over the entity's full table. No I/O happens
    /// until the returned query is fetched; an empty table fetches to an
    /// empty vec.
    pub fn get_all(&self) -> SelectQuery<E> {
        SelectQuery::new()
    }

    /// Find one entity by key. `None` when no row matches.
    pub async fn get_by_id(&self, key: &E::Key) -> AppResult<Option<E>> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?",
            E::TABLE,
            E::KEY_COLUMN
        );
        sqlx::query_as::<_, E>(&sql)
            .bind(key.clone())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error::<E>("find by key", e))
    }

    /// Realize all rows, eagerly loading each named relation.
    ///
    /// Relations are loaded independently, one query each; nothing is
    /// loaded transitively beyond what the caller names.
    pub async fn get_all_with(&self, relations: &[&dyn Relation<E>]) -> AppResult<Vec<E>> {
        let mut rows = self.get_all().fetch(&self.pool).await?;
        self.load_relations(&mut rows, relations).await?;
        Ok(rows)
    }

    /// Realize the rows matching all filter conditions, then eagerly load
    /// the named relations. Loading never changes which rows match.
    pub async fn get_list(
        &self,
        filters: &[FilterField],
        relations: &[&dyn Relation<E>],
    ) -> AppResult<Vec<E>> {
        let mut rows = self
            .get_all()
            .filter_all(filters)
            .fetch(&self.pool)
            .await?;
        self.load_relations(&mut rows, relations).await?;
        Ok(rows)
    }

    /// Realize the first row matching all filter conditions, in the
    /// database's iteration order. Zero matches is `None`; more than one
    /// match is not an error.
    pub async fn get_single(
        &self,
        filters: &[FilterField],
        relations: &[&dyn Relation<E>],
    ) -> AppResult<Option<E>> {
        let found = self
            .get_all()
            .filter_all(filters)
            .fetch_optional(&self.pool)
            .await?;
        match found {
            Some(row) => {
                let mut rows = vec![row];
                self.load_relations(&mut rows, relations).await?;
                Ok(rows.pop())
            }
            None => Ok(None),
        }
    }

    /// Insert a new entity and commit. Returns the key value the
    /// database assigned (the row's rowid; equal to the entity's own key
    /// for entities with caller-assigned keys).
    pub async fn insert(&self, entity: &E) -> AppResult<i64> {
        validate(entity)?;
        let sql = insert_sql::<E>();
        let mut query = sqlx::query(&sql);
        if !E::KEY_GENERATED {
            query = query.bind(entity.key());
        }
        query = entity.bind_data(query);
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| db_error::<E>("insert", e))?;
        let id = result.last_insert_rowid();
        debug!(table = E::TABLE, rowid = id, "Inserted entity");
        Ok(id)
    }

    /// Overwrite every column of an existing entity and commit. The full
    /// row is written — no change diffing. `NotFound` when no row has
    /// the entity's key.
    pub async fn update(&self, entity: &E) -> AppResult<()> {
        validate(entity)?;
        let sql = update_sql::<E>();
        let result = entity
            .bind_data(sqlx::query(&sql))
            .bind(entity.key())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error::<E>("update", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "No {} row with key {:?}",
                E::TABLE,
                entity.key()
            )));
        }
        Ok(())
    }

    /// Delete by key. A missing row is a silent no-op reported as
    /// `Ok(false)`; `Ok(true)` means a row was removed.
    pub async fn delete(&self, key: &E::Key) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE {} = ?", E::TABLE, E::KEY_COLUMN);
        let result = sqlx::query(&sql)
            .bind(key.clone())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error::<E>("delete", e))?;
        let deleted = result.rows_affected() > 0;
        if !deleted {
            debug!(table = E::TABLE, key = ?key, "Delete matched no row");
        }
        Ok(deleted)
    }

    /// Delete every row matching all filter conditions in one statement.
    /// Returns the number of rows removed; zero matches is not an error.
    pub async fn delete_where(&self, filters: &[FilterField]) -> AppResult<u64> {
        let mut sql = format!("DELETE FROM {}", E::TABLE);
        sql.push_str(&crate::query::render_where(filters)?);
        let mut query = sqlx::query(&sql);
        for filter in filters {
            query = crate::query::bind_filter_query(query, filter);
        }
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| db_error::<E>("filtered delete", e))?;
        let removed = result.rows_affected();
        debug!(table = E::TABLE, removed, "Filtered delete");
        Ok(removed)
    }

    /// Clear the entity's table. Returns the number of rows removed.
    pub async fn delete_all(&self) -> AppResult<u64> {
        self.delete_where(&[]).await
    }

    /// Insert a batch of entities in one transaction. A failure anywhere
    /// rolls back the whole batch.
    pub async fn add(&self, items: &[E]) -> AppResult<()> {
        for item in items {
            validate(item)?;
        }
        let mut tx = self.begin().await?;
        let sql = insert_sql::<E>();
        for item in items {
            let mut query = sqlx::query(&sql);
            if !E::KEY_GENERATED {
                query = query.bind(item.key());
            }
            item.bind_data(query)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error::<E>("bulk insert", e))?;
        }
        self.commit(tx).await
    }

    /// Delete a batch of entities (by their keys) in one transaction.
    pub async fn remove(&self, items: &[E]) -> AppResult<()> {
        let mut tx = self.begin().await?;
        let sql = format!("DELETE FROM {} WHERE {} = ?", E::TABLE, E::KEY_COLUMN);
        for item in items {
            sqlx::query(&sql)
                .bind(item.key())
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error::<E>("bulk delete", e))?;
        }
        self.commit(tx).await
    }

    /// Overwrite a batch of entities in one transaction.
    pub async fn update_many(&self, items: &[E]) -> AppResult<()> {
        for item in items {
            validate(item)?;
        }
        let mut tx = self.begin().await?;
        let sql = update_sql::<E>();
        for item in items {
            item.bind_data(sqlx::query(&sql))
                .bind(item.key())
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error::<E>("bulk update", e))?;
        }
        self.commit(tx).await
    }

    /// Count all rows for the entity type.
    pub async fn count(&self) -> AppResult<u64> {
        self.get_all().count(&self.pool).await
    }

    /// Stored procedure dispatch. SQLite has no stored procedures; this
    /// fails explicitly rather than pretending to succeed.
    pub async fn call_stored_proc(
        &self,
        name: &str,
        _params: &[(String, String)],
    ) -> AppResult<()> {
        Err(AppError::not_implemented(format!(
            "Stored procedure '{name}' is not supported"
        )))
    }

    async fn load_relations(
        &self,
        rows: &mut [E],
        relations: &[&dyn Relation<E>],
    ) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        for relation in relations {
            debug!(
                table = E::TABLE,
                relation = relation.name(),
                rows = rows.len(),
                "Loading relation"
            );
            relation.load(&self.pool, rows).await?;
        }
        Ok(())
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| db_error::<E>("begin transaction", e))
    }

    async fn commit(&self, tx: Transaction<'static, Sqlite>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| db_error::<E>("commit transaction", e))
    }
}

#[async_trait]
impl<E: Entity> Repository<E, E::Key> for SqlRepository<E> {
    async fn get_by_id(&self, key: &E::Key) -> AppResult<Option<E>> {
        SqlRepository::get_by_id(self, key).await
    }

    async fn insert(&self, entity: &E) -> AppResult<()> {
        SqlRepository::insert(self, entity).await.map(|_| ())
    }

    async fn update(&self, entity: &E) -> AppResult<()> {
        SqlRepository::update(self, entity).await
    }

    async fn delete(&self, key: &E::Key) -> AppResult<bool> {
        SqlRepository::delete(self, key).await
    }

    async fn count(&self) -> AppResult<u64> {
        SqlRepository::count(self).await
    }
}

fn insert_sql<E: Entity>() -> String {
    let mut columns: Vec<&str> = Vec::new();
    if !E::KEY_GENERATED {
        columns.push(E::KEY_COLUMN);
    }
    columns.extend_from_slice(E::DATA_COLUMNS);
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        E::TABLE,
        columns.join(", "),
        placeholders
    )
}

fn update_sql<E: Entity>() -> String {
    let assignments = E::DATA_COLUMNS
        .iter()
        .map(|c| format!("{c} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        E::TABLE,
        assignments,
        E::KEY_COLUMN
    )
}

fn validate<E: Entity>(entity: &E) -> AppResult<()> {
    entity
        .validate()
        .map_err(|e| AppError::with_source(ErrorKind::Validation, "Entity failed validation", e))
}

/// Log a persistence failure and convert it into a typed error. Unique
/// constraint violations surface as `Conflict`; everything else as
/// `Database`.
fn db_error<E: Entity>(operation: &str, err: sqlx::Error) -> AppError {
    error!(table = E::TABLE, operation, error = %err, "Persistence operation failed");
    let kind = match err.as_database_error().map(|d| d.kind()) {
        Some(sqlx::error::ErrorKind::UniqueViolation) => ErrorKind::Conflict,
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, format!("Failed to {operation} in {}", E::TABLE), err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsuite_entity::car::Car;
    use dsuite_entity::school::Course;

    #[test]
    fn test_insert_sql_omits_generated_key() {
        assert_eq!(
            insert_sql::<Car>(),
            "INSERT INTO cars (make, model, year, mileage) VALUES (?, ?, ?, ?)"
        );
    }

    #[test]
    fn test_insert_sql_includes_explicit_key() {
        assert_eq!(
            insert_sql::<Course>(),
            "INSERT INTO courses (course_id, title, credits) VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn test_update_sql_writes_all_data_columns() {
        assert_eq!(
            update_sql::<Car>(),
            "UPDATE cars SET make = ?, model = ?, year = ?, mileage = ? WHERE car_id = ?"
        );
    }
}
