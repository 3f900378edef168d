//! Concrete repositories for the demo entities.
//!
//! Each is a thin binding of [`SqlRepository`](crate::SqlRepository) to
//! one entity type plus whatever entity-specific finders the demo needs.
//! The relation loaders for the school entities live next to the
//! repositories that use them.

pub mod car;
pub mod course;
pub mod enrollment;
pub mod student;

pub use car::CarRepository;
pub use course::CourseRepository;
pub use enrollment::EnrollmentRepository;
pub use student::StudentRepository;
