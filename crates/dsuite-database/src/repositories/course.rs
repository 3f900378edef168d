//! Course repository.

use sqlx::SqlitePool;

use dsuite_core::result::AppResult;
use dsuite_core::types::filter::FilterField;
use dsuite_entity::school::Course;

use crate::repository::SqlRepository;

/// Repository for course CRUD and query operations.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    inner: SqlRepository<Course>,
}

impl CourseRepository {
    /// Create a new course repository bound to the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqlRepository::new(pool),
        }
    }

    /// The generic repository surface.
    pub fn repo(&self) -> &SqlRepository<Course> {
        &self.inner
    }

    /// Find a course by its title.
    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<Course>> {
        self.inner
            .get_single(&[FilterField::eq("title", title)], &[])
            .await
    }
}
