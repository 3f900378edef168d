//! # dsuite-entity
//!
//! Demo entity models for DSuite. Every model represents a database table
//! row and derives `Debug`, `Clone`, `Serialize`, `Deserialize`,
//! `sqlx::FromRow`, and `validator::Validate`.
//!
//! The [`Entity`] trait carries the per-entity metadata (table name, key
//! column, key extraction, writable columns, bind order) that the generic
//! repository and query layers are parametrized by. Implementing it is
//! the Rust replacement for subclassing a repository base class per key
//! type: the key lives wherever the entity says it does.

pub mod car;
pub mod meta;
pub mod school;

pub use meta::Entity;
