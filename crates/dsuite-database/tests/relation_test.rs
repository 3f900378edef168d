//! Integration tests for eager relation loading on the school entities.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use dsuite_core::types::filter::FilterField;
use dsuite_database::repositories::enrollment::{EnrollmentCourse, EnrollmentRepository};
use dsuite_database::repositories::student::StudentRepository;
use dsuite_database::repository::SqlRepository;
use dsuite_database::schema;
use dsuite_entity::school::{Enrollment, Grade};

async fn seeded_school_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory database");
    schema::ensure_school_schema(&pool).await.expect("schema");
    schema::seed_school(&pool).await.expect("seed");
    pool
}

#[tokio::test]
async fn seeding_is_idempotent() {
    let pool = seeded_school_pool().await;
    schema::seed_school(&pool).await.expect("second seed");

    let students: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(students, 8);
}

#[tokio::test]
async fn enrollment_lookup_loads_both_relations_on_request() {
    let pool = seeded_school_pool().await;
    let enrollments = EnrollmentRepository::new(pool.clone());

    let found = enrollments
        .find_with_relations(1)
        .await
        .expect("query")
        .expect("present");

    let student = found.student.expect("student loaded");
    let course = found.course.expect("course loaded");
    assert_eq!(student.last_name, "Alexander");
    assert_eq!(course.title, "Chemistry");
    assert_eq!(found.grade, Some(Grade::A));
}

#[tokio::test]
async fn relations_stay_unloaded_unless_requested() {
    let pool = seeded_school_pool().await;
    let repo = SqlRepository::<Enrollment>::new(pool);

    let found = repo
        .get_single(&[FilterField::eq_int("enrollment_id", 1)], &[])
        .await
        .expect("query")
        .expect("present");
    assert!(found.student.is_none());
    assert!(found.course.is_none());
}

#[tokio::test]
async fn relation_loading_does_not_change_which_rows_match() {
    let pool = seeded_school_pool().await;
    let repo = SqlRepository::<Enrollment>::new(pool);

    let filters = [FilterField::eq_int("student_id", 2)];
    let bare = repo.get_list(&filters, &[]).await.expect("bare query");
    let loaded = repo
        .get_list(&filters, &[&EnrollmentCourse])
        .await
        .expect("loaded query");

    assert_eq!(bare.len(), loaded.len());
    assert!(loaded.iter().all(|e| e.course.is_some()));
    assert!(bare.iter().all(|e| e.course.is_none()));
}

#[tokio::test]
async fn student_lookup_loads_enrollments_in_one_extra_query() {
    let pool = seeded_school_pool().await;
    let students = StudentRepository::new(pool.clone());

    let meredith = students
        .find_by_name("Alonso", "Meredith", true)
        .await
        .expect("query")
        .expect("present");
    assert_eq!(meredith.enrollments.len(), 3);
    assert!(meredith
        .enrollments
        .iter()
        .all(|e| e.student_id == meredith.id));

    let unloaded = students
        .find_by_name("Alonso", "Meredith", false)
        .await
        .expect("query")
        .expect("present");
    assert!(unloaded.enrollments.is_empty());
}

#[tokio::test]
async fn last_name_prefix_search_matches_seeded_roster() {
    let pool = seeded_school_pool().await;
    let students = StudentRepository::new(pool);

    let with_a = students
        .find_by_last_name_prefix("A")
        .await
        .expect("query");
    let names: Vec<&str> = with_a.iter().map(|s| s.last_name.as_str()).collect();
    assert_eq!(with_a.len(), 3);
    assert!(names.contains(&"Alexander"));
    assert!(names.contains(&"Alonso"));
    assert!(names.contains(&"Anand"));
}
