//! Paged walkthrough over the car database.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use dsuite_core::error::AppError;
use dsuite_core::types::filter::FilterField;
use dsuite_core::types::pagination::Pager;
use dsuite_core::types::sorting::SortField;
use dsuite_database::query::query_page;
use dsuite_entity::car::Car;

use crate::output::{self, OutputFormat};

/// Arguments for the page-cars command
#[derive(Debug, Args)]
pub struct PageCarsArgs {
    /// Only include cars with mileage strictly above this reading
    #[arg(short, long, default_value_t = 50_000)]
    pub mileage: i64,

    /// Rows per page
    #[arg(short, long, default_value_t = 50)]
    pub page_size: u64,
}

/// Car display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CarRow {
    /// Key
    id: i64,
    /// Manufacturer
    make: String,
    /// Model
    model: String,
    /// Model year
    year: i64,
    /// Odometer
    mileage: i64,
}

impl From<&Car> for CarRow {
    fn from(car: &Car) -> Self {
        Self {
            id: car.car_id,
            make: car.make.clone(),
            model: car.model.clone(),
            year: car.year,
            mileage: car.mileage,
        }
    }
}

/// Execute the page-cars command
pub async fn execute(
    args: &PageCarsArgs,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let factory = super::connect(env).await?;
    let pool = super::cars_pool(&factory).await?;

    let mut pager = Pager::new(args.page_size)
        .with_filter(FilterField::gt("mileage", args.mileage))
        .with_sort(SortField::asc("make"))
        .with_sort(SortField::asc("model"))
        .with_sort(SortField::asc("mileage"));

    loop {
        let index = pager.page_index();
        let page = query_page::<Car>(&pool, &mut pager)
            .await?
            .fetch(&pool)
            .await?;
        let rows: Vec<CarRow> = page.iter().map(CarRow::from).collect();
        output::print_page(index, &rows, format);
        if !pager.has_next_page() {
            break;
        }
    }

    println!(
        "{} matching cars across {} pages of {}",
        pager.total_rows().unwrap_or(0),
        pager.total_pages().unwrap_or(0),
        pager.page_size()
    );
    factory.close().await;
    Ok(())
}
