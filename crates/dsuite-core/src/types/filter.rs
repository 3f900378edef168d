//! Filter conditions for dynamic query building.
//!
//! A filter is a flat list of [`FilterField`] conditions that the query
//! layer combines with `AND`. Building a filter performs no I/O; it is
//! translated into SQL only when the enclosing query is executed.

use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// SQL `LIKE` pattern match.
    Like,
    /// SQL `IN` list membership.
    In,
    /// SQL `IS NULL` check.
    IsNull,
    /// SQL `IS NOT NULL` check.
    IsNotNull,
}

/// A dynamic filter value covering the SQL types the demo schema uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for the `In` operator).
    StringList(Vec<String>),
    /// No value (for `IsNull` / `IsNotNull`).
    Null,
}

/// A single condition on a named column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterField {
    /// The column name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter condition.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for a string equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.into()))
    }

    /// Shorthand for an integer equality condition.
    pub fn eq_int(field: impl Into<String>, value: i64) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::Integer(value))
    }

    /// Shorthand for an integer greater-than condition.
    pub fn gt(field: impl Into<String>, value: i64) -> Self {
        Self::new(field, FilterOp::Gt, FilterValue::Integer(value))
    }

    /// Shorthand for a `LIKE` pattern condition.
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Like, FilterValue::String(pattern.into()))
    }
}
