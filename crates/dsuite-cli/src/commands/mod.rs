//! CLI command definitions and dispatch.

pub mod crud;
pub mod page;
pub mod school;
pub mod seed;

use clap::{Parser, Subcommand};
use sqlx::SqlitePool;

use dsuite_core::config::AppConfig;
use dsuite_core::error::AppError;
use dsuite_database::connection::ConnectionFactory;

use crate::output::OutputFormat;

/// DSuite — paged data-access demo suite
#[derive(Debug, Parser)]
#[command(name = "dsuite", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects config/{env}.toml overlay)
    #[arg(short, long, default_value = "default")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Populate the car database with generated rows
    Seed(seed::SeedArgs),
    /// Walk the high-mileage cars one page at a time
    PageCars(page::PageCarsArgs),
    /// Point CRUD round trip on the car repository
    Crud,
    /// School demo: seed roster, enroll a student, load relations
    School,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Seed(args) => seed::execute(args, &self.env).await,
            Commands::PageCars(args) => page::execute(args, &self.env, self.format).await,
            Commands::Crud => crud::execute(&self.env, self.format).await,
            Commands::School => school::execute(&self.env, self.format).await,
        }
    }
}

/// Helper: load configuration and connect every configured database
pub async fn connect(env: &str) -> Result<ConnectionFactory, AppError> {
    let config = AppConfig::load(env)?;
    ConnectionFactory::from_config(&config).await
}

/// Helper: resolve the car database pool and make sure its schema exists
pub async fn cars_pool(factory: &ConnectionFactory) -> Result<SqlitePool, AppError> {
    let pool = factory.pool("dsuite")?.clone();
    dsuite_database::schema::ensure_cars_schema(&pool).await?;
    Ok(pool)
}

/// Helper: resolve the school database pool with schema and seed data ready
pub async fn school_pool(factory: &ConnectionFactory) -> Result<SqlitePool, AppError> {
    let pool = factory.pool("school")?.clone();
    dsuite_database::schema::ensure_school_schema(&pool).await?;
    dsuite_database::schema::seed_school(&pool).await?;
    Ok(pool)
}
