//! Car repository.

use sqlx::SqlitePool;

use dsuite_core::result::AppResult;
use dsuite_core::types::filter::FilterField;
use dsuite_entity::car::Car;

use crate::repository::SqlRepository;

/// Repository for car CRUD and query operations.
#[derive(Debug, Clone)]
pub struct CarRepository {
    inner: SqlRepository<Car>,
}

impl CarRepository {
    /// Create a new car repository bound to the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqlRepository::new(pool),
        }
    }

    /// The generic repository surface.
    pub fn repo(&self) -> &SqlRepository<Car> {
        &self.inner
    }

    /// List all cars of one make.
    pub async fn find_by_make(&self, make: &str) -> AppResult<Vec<Car>> {
        self.inner
            .get_list(&[FilterField::eq("make", make)], &[])
            .await
    }

    /// List cars with mileage strictly above the given reading.
    pub async fn find_high_mileage(&self, mileage: i64) -> AppResult<Vec<Car>> {
        self.inner
            .get_list(&[FilterField::gt("mileage", mileage)], &[])
            .await
    }
}
