//! Domain model for user accounts.
//!
//! Users are the identity anchor for memberships and task relations. The
//! domain owns the scalar validation rules; credential handling stays behind
//! ports.

mod error;
mod ids;
mod user;

pub use error::AccountDomainError;
pub use ids::{DisplayName, EmailAddress, UserId};
pub use user::{PersistedUserData, User, UserIdentifier};
