//! Student repository and the student → enrollments relation.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;

use dsuite_core::error::{AppError, ErrorKind};
use dsuite_core::result::AppResult;
use dsuite_core::types::filter::FilterField;
use dsuite_entity::school::{Enrollment, Student};

use crate::relation::{in_clause, Relation};
use crate::repository::SqlRepository;

/// Repository for student CRUD and query operations.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    inner: SqlRepository<Student>,
}

impl StudentRepository {
    /// Create a new student repository bound to the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqlRepository::new(pool),
        }
    }

    /// The generic repository surface.
    pub fn repo(&self) -> &SqlRepository<Student> {
        &self.inner
    }

    /// List students whose family name starts with the given prefix.
    pub async fn find_by_last_name_prefix(&self, prefix: &str) -> AppResult<Vec<Student>> {
        self.inner
            .get_list(&[FilterField::like("last_name", format!("{prefix}%"))], &[])
            .await
    }

    /// Find one student by full name, with enrollments eagerly loaded on
    /// request.
    pub async fn find_by_name(
        &self,
        last_name: &str,
        first_mid_name: &str,
        load_enrollments: bool,
    ) -> AppResult<Option<Student>> {
        let filters = [
            FilterField::eq("last_name", last_name),
            FilterField::eq("first_mid_name", first_mid_name),
        ];
        if load_enrollments {
            self.inner
                .get_single(&filters, &[&StudentEnrollments])
                .await
        } else {
            self.inner.get_single(&filters, &[]).await
        }
    }
}

/// Eager loader for a student's enrollments.
pub struct StudentEnrollments;

#[async_trait]
impl Relation<Student> for StudentEnrollments {
    fn name(&self) -> &'static str {
        "enrollments"
    }

    async fn load(&self, pool: &SqlitePool, rows: &mut [Student]) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut ids: Vec<i64> = rows.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();

        let sql = format!(
            "SELECT * FROM enrollments WHERE {}",
            in_clause("student_id", ids.len())
        );
        let mut query = sqlx::query_as::<_, Enrollment>(&sql);
        for id in &ids {
            query = query.bind(*id);
        }
        let enrollments = query.fetch_all(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load enrollments", e)
        })?;

        let mut by_student: HashMap<i64, Vec<Enrollment>> = HashMap::new();
        for enrollment in enrollments {
            by_student
                .entry(enrollment.student_id)
                .or_default()
                .push(enrollment);
        }
        for student in rows {
            student.enrollments = by_student.remove(&student.id).unwrap_or_default();
        }
        Ok(())
    }
}
