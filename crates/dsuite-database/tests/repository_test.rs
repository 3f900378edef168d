//! Integration tests for the generic repository against in-memory SQLite.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use dsuite_core::error::ErrorKind;
use dsuite_database::repository::SqlRepository;
use dsuite_database::schema;
use dsuite_entity::car::Car;
use dsuite_entity::school::Course;

/// One shared in-memory database. A single connection keeps every query
/// on the same memory instance.
async fn cars_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory database");
    schema::ensure_cars_schema(&pool).await.expect("schema");
    pool
}

async fn school_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory database");
    schema::ensure_school_schema(&pool).await.expect("schema");
    pool
}

#[tokio::test]
async fn insert_then_get_by_id_round_trips_all_fields() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let car = Car::new("Ford", "Focus", 2004, 120_000);
    let id = repo.insert(&car).await.expect("insert");

    let found = repo.get_by_id(&id).await.expect("lookup").expect("present");
    assert_eq!(found.car_id, id);
    assert_eq!(found.make, "Ford");
    assert_eq!(found.model, "Focus");
    assert_eq!(found.year, 2004);
    assert_eq!(found.mileage, 120_000);
}

#[tokio::test]
async fn get_by_id_returns_none_for_missing_key() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let found = repo.get_by_id(&9_999).await.expect("lookup");
    assert!(found.is_none());
}

#[tokio::test]
async fn insert_rejects_invalid_entity_before_io() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let err = repo
        .insert(&Car::new("", "Focus", 2004, 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(repo.count().await.expect("count"), 0);
}

#[tokio::test]
async fn update_changes_one_field_and_preserves_the_rest() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let id = repo
        .insert(&Car::new("Ford", "Focus", 2004, 120_000))
        .await
        .expect("insert");

    let mut car = repo.get_by_id(&id).await.expect("lookup").expect("present");
    car.mileage = 125_000;
    repo.update(&car).await.expect("update");

    let updated = repo.get_by_id(&id).await.expect("lookup").expect("present");
    assert_eq!(updated.mileage, 125_000);
    assert_eq!(updated.make, "Ford");
    assert_eq!(updated.model, "Focus");
    assert_eq!(updated.year, 2004);
}

#[tokio::test]
async fn update_of_missing_row_reports_not_found() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let mut ghost = Car::new("Ford", "Focus", 2004, 1);
    ghost.car_id = 42;
    let err = repo.update(&ghost).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_then_get_by_id_returns_none() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let id = repo
        .insert(&Car::new("BMW", "M3", 2010, 40_000))
        .await
        .expect("insert");

    assert!(repo.delete(&id).await.expect("delete"));
    assert!(repo.get_by_id(&id).await.expect("lookup").is_none());
}

#[tokio::test]
async fn delete_of_missing_key_is_a_reported_no_op() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let deleted = repo.delete(&777).await.expect("delete must not fail");
    assert!(!deleted);
}

#[tokio::test]
async fn get_all_is_idempotent_without_mutation() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    for i in 0..10 {
        repo.insert(&Car::new("Kia", format!("Model{i}"), 2015, 1_000 * i))
            .await
            .expect("insert");
    }

    let mut first = repo.get_all_with(&[]).await.expect("first fetch");
    let mut second = repo.get_all_with(&[]).await.expect("second fetch");
    first.sort_by_key(|c| c.car_id);
    second.sort_by_key(|c| c.car_id);
    assert_eq!(first, second);
}

#[tokio::test]
async fn get_single_returns_first_match_or_none() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    repo.insert(&Car::new("Audi", "A4", 2018, 30_000))
        .await
        .expect("insert");
    repo.insert(&Car::new("Audi", "A6", 2019, 20_000))
        .await
        .expect("insert");

    let filters = [dsuite_core::types::filter::FilterField::eq("make", "Audi")];
    let found = repo.get_single(&filters, &[]).await.expect("query");
    assert!(found.is_some());

    let missing = [dsuite_core::types::filter::FilterField::eq("make", "Saab")];
    let none = repo.get_single(&missing, &[]).await.expect("query");
    assert!(none.is_none());
}

#[tokio::test]
async fn delete_all_clears_the_table_and_reports_the_count() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    for i in 0..5 {
        repo.insert(&Car::new("Opel", format!("Astra{i}"), 2008, 60_000))
            .await
            .expect("insert");
    }

    let removed = repo.delete_all().await.expect("clear");
    assert_eq!(removed, 5);
    assert_eq!(repo.count().await.expect("count"), 0);

    // Clearing an already-empty table removes nothing and does not fail.
    let removed = repo.delete_all().await.expect("clear empty");
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn filtered_delete_removes_only_matching_rows() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    repo.insert(&Car::new("Ford", "Fiesta", 2001, 90_000))
        .await
        .expect("insert");
    repo.insert(&Car::new("Ford", "Focus", 2002, 30_000))
        .await
        .expect("insert");
    repo.insert(&Car::new("Opel", "Corsa", 2003, 80_000))
        .await
        .expect("insert");

    let filters = [
        dsuite_core::types::filter::FilterField::eq("make", "Ford"),
        dsuite_core::types::filter::FilterField::gt("mileage", 50_000),
    ];
    let removed = repo.delete_where(&filters).await.expect("delete");
    assert_eq!(removed, 1);

    let mut remaining = repo.get_all_with(&[]).await.expect("fetch");
    remaining.sort_by(|a, b| a.model.cmp(&b.model));
    let models: Vec<&str> = remaining.iter().map(|c| c.model.as_str()).collect();
    assert_eq!(models, ["Corsa", "Focus"]);
}

#[tokio::test]
async fn bulk_add_commits_all_items_at_once() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let batch = vec![
        Car::new("Ford", "Fiesta", 2001, 90_000),
        Car::new("Ford", "Focus", 2002, 80_000),
        Car::new("Ford", "Mondeo", 2003, 70_000),
    ];
    repo.add(&batch).await.expect("bulk insert");
    assert_eq!(repo.count().await.expect("count"), 3);
}

#[tokio::test]
async fn bulk_add_with_conflicting_key_rejects_whole_batch() {
    let pool = school_pool().await;
    let repo = SqlRepository::<Course>::new(pool);

    repo.insert(&Course::new(5022, "Advanced Rust", 4))
        .await
        .expect("insert");

    // The middle item collides with the existing course number.
    let batch = vec![
        Course::new(5023, "Databases", 3),
        Course::new(5022, "Duplicate", 1),
        Course::new(5024, "Compilers", 4),
    ];
    let err = repo.add(&batch).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Nothing from the batch was committed.
    assert_eq!(repo.count().await.expect("count"), 1);
    assert!(repo.get_by_id(&5023).await.expect("lookup").is_none());
    assert!(repo.get_by_id(&5024).await.expect("lookup").is_none());
}

#[tokio::test]
async fn bulk_remove_and_update_many() {
    let pool = school_pool().await;
    let repo = SqlRepository::<Course>::new(pool);

    let courses = vec![
        Course::new(101, "Intro", 2),
        Course::new(102, "Middle", 3),
        Course::new(103, "Capstone", 4),
    ];
    repo.add(&courses).await.expect("bulk insert");

    let renamed: Vec<Course> = courses
        .iter()
        .map(|c| Course::new(c.course_id, format!("{} II", c.title), c.credits))
        .collect();
    repo.update_many(&renamed).await.expect("bulk update");
    let after = repo
        .get_by_id(&102)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(after.title, "Middle II");

    repo.remove(&renamed[..2]).await.expect("bulk delete");
    assert_eq!(repo.count().await.expect("count"), 1);
    assert!(repo.get_by_id(&103).await.expect("lookup").is_some());
}

#[tokio::test]
async fn stored_proc_dispatch_is_an_explicit_gap() {
    let pool = cars_pool().await;
    let repo = SqlRepository::<Car>::new(pool);

    let err = repo
        .call_stored_proc("sp_recalculate", &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotImplemented);
}
