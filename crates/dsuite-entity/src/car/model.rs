//! Car entity model.

use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::FromRow;
use validator::Validate;

use crate::meta::Entity;

/// A car row in the `cars` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
pub struct Car {
    /// Primary key, assigned by the database.
    pub car_id: i64,
    /// Manufacturer name.
    #[validate(length(min = 1, max = 128))]
    pub make: String,
    /// Model name.
    #[validate(length(min = 1, max = 128))]
    pub model: String,
    /// Model year.
    pub year: i64,
    /// Odometer reading.
    pub mileage: i64,
}

impl Car {
    /// Create a car with an unassigned key.
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i64, mileage: i64) -> Self {
        Self {
            car_id: 0,
            make: make.into(),
            model: model.into(),
            year,
            mileage,
        }
    }
}

impl Entity for Car {
    type Key = i64;

    const TABLE: &'static str = "cars";
    const KEY_COLUMN: &'static str = "car_id";
    const KEY_GENERATED: bool = true;
    const DATA_COLUMNS: &'static [&'static str] = &["make", "model", "year", "mileage"];

    fn key(&self) -> i64 {
        self.car_id
    }

    fn bind_data<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(self.make.clone())
            .bind(self.model.clone())
            .bind(self.year)
            .bind(self.mileage)
    }
}
