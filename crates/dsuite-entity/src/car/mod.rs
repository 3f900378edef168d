//! Car entity (the "database first" demo table).

pub mod model;

pub use model::Car;
