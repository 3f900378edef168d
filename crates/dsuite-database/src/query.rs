//! Deferred query composition and the pager execution function.
//!
//! A [`SelectQuery`] is a description of a query — filter conditions,
//! sort order, limit/offset — that performs no I/O until one of the
//! explicit execution calls (`fetch`, `fetch_optional`, `count`) is
//! awaited. Composition is cheap and synchronous; only execution touches
//! the database. This split lets a caller hold a fully composed page
//! query while doing other work, and it is what allows the pager to pay
//! for its count query exactly once.

use std::fmt::Write as _;
use std::marker::PhantomData;

use sqlx::SqlitePool;
use tracing::debug;

use dsuite_core::error::{AppError, ErrorKind};
use dsuite_core::result::AppResult;
use dsuite_core::types::filter::{FilterField, FilterOp, FilterValue};
use dsuite_core::types::pagination::Pager;
use dsuite_core::types::sorting::SortField;
use dsuite_entity::Entity;

/// A deferred `SELECT` over one entity's table.
#[derive(Debug, Clone)]
pub struct SelectQuery<E: Entity> {
    filters: Vec<FilterField>,
    sort: Vec<SortField>,
    limit: Option<u64>,
    offset: Option<u64>,
    _entity: PhantomData<E>,
}

impl<E: Entity> SelectQuery<E> {
    /// An unfiltered, unsorted query over the entity's full table.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            sort: Vec::new(),
            limit: None,
            offset: None,
            _entity: PhantomData,
        }
    }

    /// Add a filter condition (`AND`ed with any existing conditions).
    pub fn filter(mut self, filter: FilterField) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add several filter conditions.
    pub fn filter_all(mut self, filters: &[FilterField]) -> Self {
        self.filters.extend_from_slice(filters);
        self
    }

    /// Append a sort column; the first is the primary ordering, later
    /// ones are tie-breaks.
    pub fn order_by(mut self, sort: SortField) -> Self {
        self.sort.push(sort);
        self
    }

    /// Append several sort columns.
    pub fn order_by_all(mut self, sort: &[SortField]) -> Self {
        self.sort.extend_from_slice(sort);
        self
    }

    /// Cap the number of rows returned.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip rows before the first returned one.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render the full `SELECT` statement.
    pub fn to_sql(&self) -> AppResult<String> {
        let mut sql = format!("SELECT * FROM {}", E::TABLE);
        sql.push_str(&self.where_clause()?);
        sql.push_str(&self.order_clause()?);
        if let Some(limit) = self.limit {
            let _ = write!(sql, " LIMIT {limit}");
            if let Some(offset) = self.offset {
                let _ = write!(sql, " OFFSET {offset}");
            }
        }
        Ok(sql)
    }

    /// Render the matching `COUNT(*)` statement. Limit and offset do not
    /// apply: the count covers the whole filtered set.
    fn count_sql(&self) -> AppResult<String> {
        let mut sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        sql.push_str(&self.where_clause()?);
        Ok(sql)
    }

    fn where_clause(&self) -> AppResult<String> {
        render_where(&self.filters)
    }

    fn order_clause(&self) -> AppResult<String> {
        if self.sort.is_empty() {
            return Ok(String::new());
        }
        let mut clause = String::from(" ORDER BY ");
        for (i, sort) in self.sort.iter().enumerate() {
            ensure_identifier(&sort.field)?;
            if i > 0 {
                clause.push_str(", ");
            }
            let _ = write!(clause, "{} {}", sort.field, sort.direction.as_sql());
        }
        Ok(clause)
    }

    /// Execute the query and realize all matching rows.
    pub async fn fetch(&self, pool: &SqlitePool) -> AppResult<Vec<E>> {
        let sql = self.to_sql()?;
        debug!(%sql, "Executing select");
        let mut query = sqlx::query_as::<_, E>(&sql);
        for filter in &self.filters {
            query = bind_filter(query, filter);
        }
        query.fetch_all(pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to query {}", E::TABLE),
                e,
            )
        })
    }

    /// Execute the query and realize the first matching row, if any.
    pub async fn fetch_optional(&self, pool: &SqlitePool) -> AppResult<Option<E>> {
        let sql = self.to_sql()?;
        debug!(%sql, "Executing select (first row)");
        let mut query = sqlx::query_as::<_, E>(&sql);
        for filter in &self.filters {
            query = bind_filter(query, filter);
        }
        query.fetch_optional(pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to query {}", E::TABLE),
                e,
            )
        })
    }

    /// Execute a `COUNT(*)` over the filtered (unpaged) set.
    pub async fn count(&self, pool: &SqlitePool) -> AppResult<u64> {
        let sql = self.count_sql()?;
        debug!(%sql, "Executing count");
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for filter in &self.filters {
            query = bind_filter_scalar(query, filter);
        }
        let total = query.fetch_one(pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to count {}", E::TABLE),
                e,
            )
        })?;
        Ok(total.max(0) as u64)
    }
}

impl<E: Entity> Default for SelectQuery<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Compose one page of results for the pager's current position.
///
/// The pager's filter and sort order are applied first (no I/O). On the
/// pager's first use, one `COUNT(*)` round trip fixes the totals. The
/// page window (`LIMIT`/`OFFSET`) is then applied for the current index,
/// the cursor is advanced, and the still-deferred query is returned —
/// the caller triggers the actual row I/O by awaiting `fetch`.
pub async fn query_page<E: Entity>(
    pool: &SqlitePool,
    pager: &mut Pager,
) -> AppResult<SelectQuery<E>> {
    let query = SelectQuery::<E>::new()
        .filter_all(pager.filter())
        .order_by_all(pager.sort());

    if !pager.is_initialized() {
        let total = query.count(pool).await?;
        pager.initialize(total);
        debug!(
            total_rows = total,
            total_pages = pager.total_pages().unwrap_or(0),
            page_size = pager.page_size(),
            "Pager initialized"
        );
    }

    let query = query.limit(pager.page_size()).offset(pager.skip());
    pager.advance();
    Ok(query)
}

/// Render a `WHERE` clause (`AND`-combined) for the given conditions.
/// Empty input renders nothing, matching every row.
pub(crate) fn render_where(filters: &[FilterField]) -> AppResult<String> {
    if filters.is_empty() {
        return Ok(String::new());
    }
    let mut clause = String::from(" WHERE ");
    for (i, filter) in filters.iter().enumerate() {
        if i > 0 {
            clause.push_str(" AND ");
        }
        render_condition(&mut clause, filter)?;
    }
    Ok(clause)
}

fn ensure_identifier(name: &str) -> AppResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "'{name}' is not a valid column name"
        )))
    }
}

fn render_condition(clause: &mut String, filter: &FilterField) -> AppResult<()> {
    ensure_identifier(&filter.field)?;
    let field = &filter.field;
    match filter.op {
        FilterOp::Eq => write_op(clause, field, "="),
        FilterOp::Ne => write_op(clause, field, "<>"),
        FilterOp::Gt => write_op(clause, field, ">"),
        FilterOp::Gte => write_op(clause, field, ">="),
        FilterOp::Lt => write_op(clause, field, "<"),
        FilterOp::Lte => write_op(clause, field, "<="),
        FilterOp::Like => write_op(clause, field, "LIKE"),
        FilterOp::In => {
            let FilterValue::StringList(values) = &filter.value else {
                return Err(AppError::validation(format!(
                    "IN condition on '{field}' requires a list value"
                )));
            };
            if values.is_empty() {
                // IN over an empty list matches nothing.
                clause.push_str("1 = 0");
            } else {
                let placeholders = vec!["?"; values.len()].join(", ");
                let _ = write!(clause, "{field} IN ({placeholders})");
            }
            Ok(())
        }
        FilterOp::IsNull => {
            let _ = write!(clause, "{field} IS NULL");
            Ok(())
        }
        FilterOp::IsNotNull => {
            let _ = write!(clause, "{field} IS NOT NULL");
            Ok(())
        }
    }?;

    // A bare Null value only makes sense with the IS NULL operators.
    if matches!(filter.value, FilterValue::Null)
        && !matches!(filter.op, FilterOp::IsNull | FilterOp::IsNotNull)
    {
        return Err(AppError::validation(format!(
            "Null value for '{field}' requires IsNull or IsNotNull"
        )));
    }
    Ok(())
}

fn write_op(clause: &mut String, field: &str, op: &str) -> AppResult<()> {
    let _ = write!(clause, "{field} {op} ?");
    Ok(())
}

fn bind_filter<'q, O>(
    query: sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &FilterField,
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    match (&filter.op, &filter.value) {
        (FilterOp::IsNull | FilterOp::IsNotNull, _) => query,
        (FilterOp::In, FilterValue::StringList(values)) => values
            .iter()
            .fold(query, |q, v| q.bind(v.clone())),
        (_, FilterValue::String(v)) => query.bind(v.clone()),
        (_, FilterValue::Integer(v)) => query.bind(*v),
        (_, FilterValue::Float(v)) => query.bind(*v),
        (_, FilterValue::Boolean(v)) => query.bind(*v),
        // Invalid combinations were rejected when the SQL was rendered.
        _ => query,
    }
}

pub(crate) fn bind_filter_query<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &FilterField,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    match (&filter.op, &filter.value) {
        (FilterOp::IsNull | FilterOp::IsNotNull, _) => query,
        (FilterOp::In, FilterValue::StringList(values)) => values
            .iter()
            .fold(query, |q, v| q.bind(v.clone())),
        (_, FilterValue::String(v)) => query.bind(v.clone()),
        (_, FilterValue::Integer(v)) => query.bind(*v),
        (_, FilterValue::Float(v)) => query.bind(*v),
        (_, FilterValue::Boolean(v)) => query.bind(*v),
        _ => query,
    }
}

fn bind_filter_scalar<'q, O>(
    query: sqlx::query::QueryScalar<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &FilterField,
) -> sqlx::query::QueryScalar<'q, sqlx::Sqlite, O, sqlx::sqlite::SqliteArguments<'q>> {
    match (&filter.op, &filter.value) {
        (FilterOp::IsNull | FilterOp::IsNotNull, _) => query,
        (FilterOp::In, FilterValue::StringList(values)) => values
            .iter()
            .fold(query, |q, v| q.bind(v.clone())),
        (_, FilterValue::String(v)) => query.bind(v.clone()),
        (_, FilterValue::Integer(v)) => query.bind(*v),
        (_, FilterValue::Float(v)) => query.bind(*v),
        (_, FilterValue::Boolean(v)) => query.bind(*v),
        _ => query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsuite_core::types::sorting::SortField;
    use dsuite_entity::car::Car;

    #[test]
    fn test_bare_select() {
        let sql = SelectQuery::<Car>::new().to_sql().expect("render");
        assert_eq!(sql, "SELECT * FROM cars");
    }

    #[test]
    fn test_filter_sort_and_page_window() {
        let sql = SelectQuery::<Car>::new()
            .filter(FilterField::gt("mileage", 50_000))
            .order_by(SortField::asc("make"))
            .order_by(SortField::desc("mileage"))
            .limit(50)
            .offset(100)
            .to_sql()
            .expect("render");
        assert_eq!(
            sql,
            "SELECT * FROM cars WHERE mileage > ? \
             ORDER BY make ASC, mileage DESC LIMIT 50 OFFSET 100"
        );
    }

    #[test]
    fn test_multiple_filters_are_anded() {
        let sql = SelectQuery::<Car>::new()
            .filter(FilterField::eq("make", "Ford"))
            .filter(FilterField::gt("year", 2000))
            .to_sql()
            .expect("render");
        assert_eq!(sql, "SELECT * FROM cars WHERE make = ? AND year > ?");
    }

    #[test]
    fn test_in_with_empty_list_matches_nothing() {
        let sql = SelectQuery::<Car>::new()
            .filter(FilterField::new(
                "make",
                FilterOp::In,
                FilterValue::StringList(vec![]),
            ))
            .to_sql()
            .expect("render");
        assert_eq!(sql, "SELECT * FROM cars WHERE 1 = 0");
    }

    #[test]
    fn test_rejects_malformed_column_name() {
        let err = SelectQuery::<Car>::new()
            .filter(FilterField::eq("make; DROP TABLE cars", "x"))
            .to_sql()
            .unwrap_err();
        assert_eq!(err.kind, dsuite_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_rejects_null_with_comparison_op() {
        let err = SelectQuery::<Car>::new()
            .filter(FilterField::new("make", FilterOp::Eq, FilterValue::Null))
            .to_sql()
            .unwrap_err();
        assert_eq!(err.kind, dsuite_core::error::ErrorKind::Validation);
    }
}
