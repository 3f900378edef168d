//! School demo: roster seeding, enrollment, and eager relation loading.

use chrono::NaiveDate;

use dsuite_core::error::AppError;
use dsuite_database::repositories::enrollment::EnrollmentRepository;
use dsuite_database::repositories::student::StudentRepository;
use dsuite_database::repository::SqlRepository;
use dsuite_entity::school::{Enrollment, Grade, Student};

use crate::output::{self, OutputFormat};

/// Execute the school command
pub async fn execute(env: &str, format: OutputFormat) -> Result<(), AppError> {
    let factory = super::connect(env).await?;
    let pool = super::school_pool(&factory).await?;

    let students = StudentRepository::new(pool.clone());
    let enrollments = EnrollmentRepository::new(pool.clone());

    // A transfer student joins and signs up for Chemistry.
    let student_repo = SqlRepository::<Student>::new(pool.clone());
    let enrolled = NaiveDate::from_ymd_opt(2006, 9, 1)
        .ok_or_else(|| AppError::internal("Invalid enrollment date"))?;
    let student_id = student_repo
        .insert(&Student::new("Tibbetts", "Donnie", enrolled))
        .await?;
    let enrollment_id = enrollments
        .repo()
        .insert(&Enrollment::new(student_id, 1050, Some(Grade::B)))
        .await?;
    output::print_success(&format!(
        "Enrolled student {} in course 1050 (enrollment {})",
        student_id, enrollment_id
    ));

    // Look the enrollment back up with both relations loaded.
    let loaded = enrollments
        .find_with_relations(enrollment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Enrollment vanished after insert"))?;
    output::print_item(&loaded, format);

    // A seeded student's course load, course relation included.
    let meredith = students
        .find_by_name("Alonso", "Meredith", false)
        .await?
        .ok_or_else(|| AppError::not_found("Student 'Alonso' missing from seed data"))?;
    let load = enrollments.find_for_student(meredith.id).await?;
    output::print_kv(
        "Alonso, Meredith",
        &format!("{} enrollments", load.len()),
    );
    for enrollment in &load {
        let title = enrollment
            .course
            .as_ref()
            .map(|c| c.title.as_str())
            .unwrap_or("?");
        let grade = enrollment
            .grade
            .map(|g| g.to_string())
            .unwrap_or_else(|| "ungraded".to_string());
        output::print_kv(title, &grade);
    }

    // Clean up the transfer student so repeated runs start from the
    // same roster.
    enrollments.repo().delete(&enrollment_id).await?;
    student_repo.delete(&student_id).await?;
    output::print_success("Removed demo student and enrollment");

    factory.close().await;
    Ok(())
}
