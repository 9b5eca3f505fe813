//! Errors shared by every store adapter.

use crate::error::ErrorKind;
use std::sync::Arc;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Another user already signed up with this email.
    #[error("email address is already registered")]
    DuplicateEmail,

    /// A membership for the (user, group) pair already exists.
    #[error("membership for this user and group already exists")]
    DuplicateMembership,

    /// A relation for the (task, user) pair already exists.
    #[error("relation for this task and user already exists")]
    DuplicateRelation,

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateEmail | Self::DuplicateMembership | Self::DuplicateRelation => {
                ErrorKind::Conflict
            }
            Self::Persistence(_) => ErrorKind::Unavailable,
        }
    }
}
