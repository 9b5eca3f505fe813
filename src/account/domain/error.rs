//! Error types for account domain validation.

use thiserror::Error;

/// Errors returned while constructing account domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountDomainError {
    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// The display name exceeds the persisted column width.
    #[error("display name exceeds {max} characters")]
    DisplayNameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// The identifier is neither a user id nor an email address.
    #[error("'{0}' is neither a user id nor an email address")]
    UnresolvableIdentifier(String),
}
