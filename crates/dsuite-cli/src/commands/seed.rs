//! Car database seeding command.

use clap::Args;
use rand::Rng;
use tracing::info;

use dsuite_core::error::AppError;
use dsuite_database::repository::SqlRepository;
use dsuite_entity::car::Car;

use crate::output;

const MAKES_AND_MODELS: &[(&str, &[&str])] = &[
    ("Audi", &["A3", "A4", "A6", "Q5"]),
    ("BMW", &["116i", "320d", "530i", "X3"]),
    ("Ford", &["Fiesta", "Focus", "Mondeo", "Kuga"]),
    ("Kia", &["Rio", "Ceed", "Sportage"]),
    ("Skoda", &["Fabia", "Octavia", "Superb"]),
    ("Tesla", &["Model 3", "Model S", "Model Y"]),
    ("Toyota", &["Yaris", "Corolla", "Camry", "RAV4"]),
];

/// Arguments for the seed command
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Number of cars to generate
    #[arg(short, long, default_value_t = 500)]
    pub count: u32,
}

/// Generate one pseudo-random car.
fn generate_car<R: Rng>(rng: &mut R) -> Car {
    let (make, models) = MAKES_AND_MODELS[rng.gen_range(0..MAKES_AND_MODELS.len())];
    let model = models[rng.gen_range(0..models.len())];
    Car::new(
        make,
        model,
        1990 + rng.gen_range(0..20),
        rng.gen_range(0..200_000),
    )
}

/// Execute the seed command
pub async fn execute(args: &SeedArgs, env: &str) -> Result<(), AppError> {
    let factory = super::connect(env).await?;
    let pool = super::cars_pool(&factory).await?;
    let repo = SqlRepository::<Car>::new(pool);

    // Start from an empty fleet so repeated runs produce the same totals.
    let removed = repo.delete_all().await?;
    if removed > 0 {
        output::print_kv("cleared", &format!("{} existing cars", removed));
    }

    info!(count = args.count, "Generating cars");
    let mut rng = rand::thread_rng();
    let batch: Vec<Car> = (0..args.count).map(|_| generate_car(&mut rng)).collect();
    repo.add(&batch).await?;

    let total = repo.count().await?;
    output::print_success(&format!(
        "Inserted {} cars ({} rows total)",
        args.count, total
    ));
    factory.close().await;
    Ok(())
}
