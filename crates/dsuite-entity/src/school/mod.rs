//! School entities (the "code first" demo tables).

pub mod course;
pub mod enrollment;
pub mod grade;
pub mod student;

pub use course::Course;
pub use enrollment::Enrollment;
pub use grade::Grade;
pub use student::Student;
