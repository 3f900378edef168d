//! Letter grade enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade for a completed enrollment. Stored as its letter in the
/// database; an ungraded enrollment is a SQL `NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Grade {
    /// Excellent.
    A,
    /// Good.
    B,
    /// Satisfactory.
    C,
    /// Poor.
    D,
    /// Fail.
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        write!(f, "{letter}")
    }
}
