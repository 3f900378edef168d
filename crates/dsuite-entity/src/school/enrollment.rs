//! Enrollment entity model (join table between students and courses).

use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::FromRow;
use validator::Validate;

use super::course::Course;
use super::grade::Grade;
use super::student::Student;
use crate::meta::Entity;

/// An enrollment row linking one student to one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Enrollment {
    /// Primary key, assigned by the database.
    pub enrollment_id: i64,
    /// Enrolled student's key.
    pub student_id: i64,
    /// Course number.
    pub course_id: i64,
    /// Assigned grade; `None` until graded.
    pub grade: Option<Grade>,
    /// The student, populated only when the relation is eagerly requested.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub student: Option<Student>,
    /// The course, populated only when the relation is eagerly requested.
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub course: Option<Course>,
}

impl Enrollment {
    /// Create an enrollment with an unassigned key.
    pub fn new(student_id: i64, course_id: i64, grade: Option<Grade>) -> Self {
        Self {
            enrollment_id: 0,
            student_id,
            course_id,
            grade,
            student: None,
            course: None,
        }
    }
}

impl Entity for Enrollment {
    type Key = i64;

    const TABLE: &'static str = "enrollments";
    const KEY_COLUMN: &'static str = "enrollment_id";
    const KEY_GENERATED: bool = true;
    const DATA_COLUMNS: &'static [&'static str] = &["student_id", "course_id", "grade"];

    fn key(&self) -> i64 {
        self.enrollment_id
    }

    fn bind_data<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(self.student_id)
            .bind(self.course_id)
            .bind(self.grade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_serializes_as_letter() {
        let json = serde_json::to_string(&Grade::B).expect("serialize");
        assert_eq!(json, "\"B\"");
    }

    #[test]
    fn test_relations_skipped_when_absent() {
        let enrollment = Enrollment::new(1, 5022, None);
        let json = serde_json::to_value(&enrollment).expect("serialize");
        assert!(json.get("student").is_none());
        assert!(json.get("course").is_none());
    }
}
