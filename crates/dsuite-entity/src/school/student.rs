//! Student entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::FromRow;
use validator::Validate;

use super::enrollment::Enrollment;
use crate::meta::Entity;

/// A student row in the `students` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Student {
    /// Primary key, assigned by the database.
    pub id: i64,
    /// Family name.
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    /// First and middle names.
    #[validate(length(min = 1, max = 50))]
    pub first_mid_name: String,
    /// Date of first enrollment.
    pub enrollment_date: NaiveDate,
    /// Enrollments for this student, populated only when the relation is
    /// eagerly requested.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub enrollments: Vec<Enrollment>,
}

impl Student {
    /// Create a student with an unassigned key.
    pub fn new(
        last_name: impl Into<String>,
        first_mid_name: impl Into<String>,
        enrollment_date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            last_name: last_name.into(),
            first_mid_name: first_mid_name.into(),
            enrollment_date,
            enrollments: Vec::new(),
        }
    }
}

impl Entity for Student {
    type Key = i64;

    const TABLE: &'static str = "students";
    const KEY_COLUMN: &'static str = "id";
    const KEY_GENERATED: bool = true;
    const DATA_COLUMNS: &'static [&'static str] =
        &["last_name", "first_mid_name", "enrollment_date"];

    fn key(&self) -> i64 {
        self.id
    }

    fn bind_data<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(self.last_name.clone())
            .bind(self.first_mid_name.clone())
            .bind(self.enrollment_date)
    }
}
