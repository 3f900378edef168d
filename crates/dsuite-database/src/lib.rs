//! # dsuite-database
//!
//! SQLite persistence layer for DSuite: connection factory, schema
//! bootstrap, the deferred [`SelectQuery`](query::SelectQuery) builder,
//! the pager execution function, the generic
//! [`SqlRepository`](repository::SqlRepository), eager relation loading,
//! and concrete per-entity repositories.

pub mod connection;
pub mod query;
pub mod relation;
pub mod repositories;
pub mod repository;
pub mod schema;

pub use connection::ConnectionFactory;
pub use query::{query_page, SelectQuery};
pub use relation::Relation;
pub use repository::SqlRepository;
