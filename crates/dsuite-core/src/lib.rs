//! # dsuite-core
//!
//! Core crate for DSuite. Contains the generic repository trait,
//! configuration schemas, paging/sorting/filter types, and the unified
//! error system.
//!
//! This crate has **no** dependency on the persistence engine; everything
//! here is plain in-memory bookkeeping that the `dsuite-database` crate
//! translates into SQL.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
