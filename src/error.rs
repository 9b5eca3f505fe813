//! Logical failure kinds shared by every service.
//!
//! Services return their own typed errors; each exposes a `kind()` accessor
//! returning one of these so an outer transport layer can map failures to
//! status codes without matching on every variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport-agnostic classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The entity is unknown or outside the caller's scope.
    NotFound,
    /// An authorization check failed.
    Forbidden,
    /// A uniqueness rule rejected the write.
    Conflict,
    /// The entity is not in a state that permits the operation.
    InvalidState,
    /// The input is malformed.
    Validation,
    /// The store contradicted itself; indicates corruption.
    InternalConsistency,
    /// The persistence layer failed.
    Unavailable,
}

impl ErrorKind {
    /// Returns the canonical snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::InvalidState => "invalid_state",
            Self::Validation => "validation",
            Self::InternalConsistency => "internal_consistency",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
