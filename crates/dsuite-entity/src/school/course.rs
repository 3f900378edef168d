//! Course entity model.

use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::FromRow;
use validator::Validate;

use crate::meta::Entity;

/// A course row in the `courses` table.
///
/// Course numbers are assigned by the registrar, not the database, so the
/// key is written explicitly on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Course {
    /// Course number (caller-assigned primary key).
    pub course_id: i64,
    /// Course title.
    #[validate(length(min = 1, max = 60))]
    pub title: String,
    /// Credit hours.
    #[validate(range(min = 0, max = 10))]
    pub credits: i64,
}

impl Course {
    /// Create a course with the given registrar-assigned number.
    pub fn new(course_id: i64, title: impl Into<String>, credits: i64) -> Self {
        Self {
            course_id,
            title: title.into(),
            credits,
        }
    }
}

impl Entity for Course {
    type Key = i64;

    const TABLE: &'static str = "courses";
    const KEY_COLUMN: &'static str = "course_id";
    const KEY_GENERATED: bool = false;
    const DATA_COLUMNS: &'static [&'static str] = &["title", "credits"];

    fn key(&self) -> i64 {
        self.course_id
    }

    fn bind_data<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query.bind(self.title.clone()).bind(self.credits)
    }
}
