//! Point CRUD round trip on the car repository.

use dsuite_core::error::AppError;
use dsuite_database::repository::SqlRepository;
use dsuite_entity::car::Car;

use crate::output::{self, OutputFormat};

/// Execute the crud command
pub async fn execute(env: &str, format: OutputFormat) -> Result<(), AppError> {
    let factory = super::connect(env).await?;
    let pool = super::cars_pool(&factory).await?;
    let repo = SqlRepository::<Car>::new(pool);

    let id = repo.insert(&Car::new("Saab", "9-5", 1999, 180_000)).await?;
    output::print_success(&format!("Inserted car {}", id));

    let mut car = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Car {} vanished after insert", id)))?;
    output::print_item(&car, format);

    car.mileage += 1_500;
    repo.update(&car).await?;
    let updated = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Car {} vanished after update", id)))?;
    output::print_kv("mileage after update", &updated.mileage.to_string());

    let deleted = repo.delete(&id).await?;
    output::print_success(&format!("Deleted car {}: {}", id, deleted));
    output::print_kv(
        "lookup after delete",
        match repo.get_by_id(&id).await? {
            Some(_) => "still present",
            None => "gone",
        },
    );

    factory.close().await;
    Ok(())
}
