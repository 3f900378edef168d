//! Schema bootstrap for the demo databases.
//!
//! Replaces migration tooling for the teaching demo: each logical
//! database gets idempotent `CREATE TABLE IF NOT EXISTS` DDL, and the
//! school database is seeded with a small fixed roster the first time it
//! is created.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use dsuite_core::error::{AppError, ErrorKind};
use dsuite_core::result::AppResult;

const CARS_DDL: &str = "
CREATE TABLE IF NOT EXISTS cars (
    car_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    make    TEXT    NOT NULL,
    model   TEXT    NOT NULL,
    year    INTEGER NOT NULL,
    mileage INTEGER NOT NULL
)";

const STUDENTS_DDL: &str = "
CREATE TABLE IF NOT EXISTS students (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    last_name       TEXT NOT NULL,
    first_mid_name  TEXT NOT NULL,
    enrollment_date TEXT NOT NULL
)";

const COURSES_DDL: &str = "
CREATE TABLE IF NOT EXISTS courses (
    course_id INTEGER PRIMARY KEY,
    title     TEXT    NOT NULL,
    credits   INTEGER NOT NULL
)";

const ENROLLMENTS_DDL: &str = "
CREATE TABLE IF NOT EXISTS enrollments (
    enrollment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id    INTEGER NOT NULL REFERENCES students (id),
    course_id     INTEGER NOT NULL REFERENCES courses (course_id),
    grade         TEXT
)";

async fn execute_ddl(pool: &SqlitePool, ddl: &str) -> AppResult<()> {
    sqlx::query(ddl).execute(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to create schema", e)
    })?;
    Ok(())
}

/// Create the `cars` table if it does not exist yet.
pub async fn ensure_cars_schema(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(pool, CARS_DDL).await?;
    info!("cars schema ready");
    Ok(())
}

/// Create the school tables if they do not exist yet.
pub async fn ensure_school_schema(pool: &SqlitePool) -> AppResult<()> {
    execute_ddl(pool, STUDENTS_DDL).await?;
    execute_ddl(pool, COURSES_DDL).await?;
    execute_ddl(pool, ENROLLMENTS_DDL).await?;
    info!("school schema ready");
    Ok(())
}

/// Seed the school database with a fixed roster, once.
///
/// A no-op when students already exist, so it is safe to call on every
/// startup.
pub async fn seed_school(pool: &SqlitePool) -> AppResult<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count students", e))?;
    if existing > 0 {
        return Ok(());
    }

    info!("Seeding school database");

    let students: &[(&str, &str, NaiveDate)] = &[
        ("Alexander", "Carson", date(2005, 9, 1)),
        ("Alonso", "Meredith", date(2002, 9, 1)),
        ("Anand", "Arturo", date(2003, 9, 1)),
        ("Barzdukas", "Gytis", date(2002, 9, 1)),
        ("Li", "Yan", date(2002, 9, 1)),
        ("Justice", "Peggy", date(2001, 9, 1)),
        ("Norman", "Laura", date(2003, 9, 1)),
        ("Olivetto", "Nino", date(2005, 9, 1)),
    ];
    for (last, first, enrolled) in students {
        sqlx::query(
            "INSERT INTO students (last_name, first_mid_name, enrollment_date) VALUES (?, ?, ?)",
        )
        .bind(last)
        .bind(first)
        .bind(enrolled)
        .execute(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to seed students", e))?;
    }

    let courses: &[(i64, &str, i64)] = &[
        (1050, "Chemistry", 3),
        (4022, "Microeconomics", 3),
        (4041, "Macroeconomics", 3),
        (1045, "Calculus", 4),
        (3141, "Trigonometry", 4),
        (2021, "Composition", 3),
        (2042, "Literature", 4),
    ];
    for (id, title, credits) in courses {
        sqlx::query("INSERT INTO courses (course_id, title, credits) VALUES (?, ?, ?)")
            .bind(id)
            .bind(title)
            .bind(credits)
            .execute(pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to seed courses", e)
            })?;
    }

    let enrollments: &[(i64, i64, Option<&str>)] = &[
        (1, 1050, Some("A")),
        (1, 4022, Some("C")),
        (1, 4041, Some("B")),
        (2, 1045, Some("B")),
        (2, 3141, Some("B")),
        (2, 2021, Some("B")),
        (3, 1050, None),
        (4, 1050, None),
        (4, 4022, Some("F")),
        (5, 2021, Some("C")),
        (6, 2021, Some("A")),
        (7, 3141, Some("A")),
    ];
    for (student_id, course_id, grade) in enrollments {
        sqlx::query("INSERT INTO enrollments (student_id, course_id, grade) VALUES (?, ?, ?)")
            .bind(student_id)
            .bind(course_id)
            .bind(grade)
            .execute(pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to seed enrollments", e)
            })?;
    }

    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Constants above are all valid calendar dates.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
