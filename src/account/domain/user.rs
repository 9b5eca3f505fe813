//! User aggregate and identifier resolution.

use super::{AccountDomainError, DisplayName, EmailAddress, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered user account.
///
/// The password hash is opaque to the domain; hashing and verification are
/// delegated to the [`crate::account::ports::PasswordHasher`] port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    email: EmailAddress,
    #[serde(skip_serializing)]
    password_hash: String,
    is_active: bool,
    is_superuser: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted display name.
    pub display_name: DisplayName,
    /// Persisted login email.
    pub email: EmailAddress,
    /// Persisted password hash.
    pub password_hash: String,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Whether the account has superuser rights.
    pub is_superuser: bool,
    /// Persisted signup timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a freshly signed-up, active, non-superuser account.
    #[must_use]
    pub fn new(
        display_name: DisplayName,
        email: EmailAddress,
        password_hash: String,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: UserId::new(),
            display_name,
            email,
            password_hash,
            is_active: true,
            is_superuser: false,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            display_name: data.display_name,
            email: data.email,
            password_hash: data.password_hash,
            is_active: data.is_active,
            is_superuser: data.is_superuser,
            created_at: data.created_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Returns the login email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns `false` when the account is frozen.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns `true` for superuser accounts.
    #[must_use]
    pub const fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    /// Returns the signup timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Freezes or unfreezes the account.
    pub const fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

/// A caller-supplied reference to a user: either its id or its email.
///
/// Resolved once at the boundary so downstream code never sniffs strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserIdentifier {
    /// Lookup by user identifier.
    Id(UserId),
    /// Lookup by login email.
    Email(EmailAddress),
}

impl UserIdentifier {
    /// Classifies a raw identifier.
    ///
    /// Anything that parses as a UUID is treated as a user id; everything
    /// else must be a valid email address.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::UnresolvableIdentifier`] when the value
    /// is neither.
    pub fn parse(raw: &str) -> Result<Self, AccountDomainError> {
        let trimmed = raw.trim();
        if let Ok(uuid) = Uuid::parse_str(trimmed) {
            return Ok(Self::Id(UserId::from_uuid(uuid)));
        }
        EmailAddress::new(trimmed)
            .map(Self::Email)
            .map_err(|_| AccountDomainError::UnresolvableIdentifier(raw.to_owned()))
    }
}

impl From<UserId> for UserIdentifier {
    fn from(id: UserId) -> Self {
        Self::Id(id)
    }
}

impl From<EmailAddress> for UserIdentifier {
    fn from(email: EmailAddress) -> Self {
        Self::Email(email)
    }
}
