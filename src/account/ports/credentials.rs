//! Password hashing and access-token contracts.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user identifier as a string.
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl AccessClaims {
    /// Builds claims for `subject` valid for `ttl` from `issued_at`.
    #[must_use]
    pub fn new(subject: impl Into<String>, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

/// Errors raised by credential primitives.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The stored hash could not be parsed or produced.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// The token is malformed, expired, or carries a bad signature.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plain-text password into a self-describing string.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the primitive fails.
    fn hash(&self, plain: &str) -> Result<String, CredentialError>;

    /// Checks a plain-text password against a stored hash.
    ///
    /// Returns `Ok(false)` for a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hashing`] when the stored hash is
    /// unreadable.
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// Signed access-token issuance and verification.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Signs the claims into a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Signing`] when signing fails.
    fn issue(&self, claims: &AccessClaims) -> Result<String, CredentialError>;

    /// Verifies a bearer token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidToken`] for any rejected token.
    fn verify(&self, token: &str) -> Result<AccessClaims, CredentialError>;
}
