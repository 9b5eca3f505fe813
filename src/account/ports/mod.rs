//! Port contracts for account credentials.
//!
//! Password hashing and token signing are swappable primitives; services
//! only see these traits.

pub mod credentials;

pub use credentials::{AccessClaims, CredentialError, PasswordHasher, TokenIssuer};
