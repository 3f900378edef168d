//! Cross-crate trait contracts.

pub mod repository;

pub use repository::Repository;
