//! Errors raised by the account service.

use crate::account::domain::{AccountDomainError, EmailAddress, UserId, UserIdentifier};
use crate::account::ports::CredentialError;
use crate::error::ErrorKind;
use crate::store::ports::StoreError;
use thiserror::Error;

/// Service-level errors for account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AccountDomainError),

    /// A credential primitive failed or rejected its input.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Another account already uses the email.
    #[error("email already registered: {0}")]
    EmailTaken(EmailAddress),

    /// Unknown email, wrong password, or a token whose subject is gone.
    #[error("invalid credentials")]
    Unauthenticated,

    /// The account exists but is frozen.
    #[error("account {0} is frozen")]
    AccountFrozen(UserId),

    /// No user matches the identifier.
    #[error("user not found: {0:?}")]
    UserNotFound(UserIdentifier),

    /// The caller is not a superuser.
    #[error("user {0} is not a superuser")]
    NotSuperuser(UserId),

    /// A superuser tried to change its own active flag.
    #[error("user {0} cannot change its own active flag")]
    SelfStatusChange(UserId),
}

impl AccountError {
    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Credential(CredentialError::InvalidToken(_))
            | Self::Unauthenticated
            | Self::AccountFrozen(_)
            | Self::NotSuperuser(_) => ErrorKind::Forbidden,
            Self::Credential(_) => ErrorKind::Unavailable,
            Self::Store(err) => err.kind(),
            Self::EmailTaken(_) => ErrorKind::Conflict,
            Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::SelfStatusChange(_) => ErrorKind::InvalidState,
        }
    }
}

/// Result type for account service operations.
pub type AccountResult<T> = Result<T, AccountError>;
