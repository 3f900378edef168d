//! Enrollment repository and its student/course relations.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;

use dsuite_core::error::{AppError, ErrorKind};
use dsuite_core::result::AppResult;
use dsuite_core::types::filter::FilterField;
use dsuite_entity::school::{Course, Enrollment, Student};

use crate::relation::{in_clause, Relation};
use crate::repository::SqlRepository;

/// Repository for enrollment CRUD and query operations.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    inner: SqlRepository<Enrollment>,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository bound to the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqlRepository::new(pool),
        }
    }

    /// The generic repository surface.
    pub fn repo(&self) -> &SqlRepository<Enrollment> {
        &self.inner
    }

    /// List a student's enrollments with the course relation loaded.
    pub async fn find_for_student(&self, student_id: i64) -> AppResult<Vec<Enrollment>> {
        self.inner
            .get_list(
                &[FilterField::eq_int("student_id", student_id)],
                &[&EnrollmentCourse],
            )
            .await
    }

    /// Find one enrollment by key with both relations loaded.
    pub async fn find_with_relations(&self, enrollment_id: i64) -> AppResult<Option<Enrollment>> {
        self.inner
            .get_single(
                &[FilterField::eq_int("enrollment_id", enrollment_id)],
                &[&EnrollmentStudent, &EnrollmentCourse],
            )
            .await
    }
}

/// Eager loader for an enrollment's student.
pub struct EnrollmentStudent;

#[async_trait]
impl Relation<Enrollment> for EnrollmentStudent {
    fn name(&self) -> &'static str {
        "student"
    }

    async fn load(&self, pool: &SqlitePool, rows: &mut [Enrollment]) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids: Vec<i64> = rows.iter().map(|e| e.student_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let sql = format!("SELECT * FROM students WHERE {}", in_clause("id", ids.len()));
        let mut query = sqlx::query_as::<_, Student>(&sql);
        for id in &ids {
            query = query.bind(*id);
        }
        let students = query.fetch_all(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load students", e)
        })?;

        let by_id: HashMap<i64, Student> =
            students.into_iter().map(|s| (s.id, s)).collect();
        for enrollment in rows {
            enrollment.student = by_id.get(&enrollment.student_id).cloned();
        }
        Ok(())
    }
}

/// Eager loader for an enrollment's course.
pub struct EnrollmentCourse;

#[async_trait]
impl Relation<Enrollment> for EnrollmentCourse {
    fn name(&self) -> &'static str {
        "course"
    }

    async fn load(&self, pool: &SqlitePool, rows: &mut [Enrollment]) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids: Vec<i64> = rows.iter().map(|e| e.course_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let sql = format!(
            "SELECT * FROM courses WHERE {}",
            in_clause("course_id", ids.len())
        );
        let mut query = sqlx::query_as::<_, Course>(&sql);
        for id in &ids {
            query = query.bind(*id);
        }
        let courses = query.fetch_all(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load courses", e)
        })?;

        let by_id: HashMap<i64, Course> =
            courses.into_iter().map(|c| (c.course_id, c)).collect();
        for enrollment in rows {
            enrollment.course = by_id.get(&enrollment.course_id).cloned();
        }
        Ok(())
    }
}
