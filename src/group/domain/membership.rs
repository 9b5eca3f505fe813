//! Membership join record and its state machine.
//!
//! A (user, group) pair moves `Absent -> Pending -> Active`. Rejection and
//! removal return it to `Absent` by deleting the row; nothing moves an
//! active membership back to pending.

use super::{GroupDomainError, GroupId, MembershipId, ParseJoinActionError};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an existing membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    /// Join requested, awaiting an admin decision.
    Pending,
    /// Accepted member.
    Active,
}

/// Admin decision on a pending join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinAction {
    /// Accept the request.
    Approve,
    /// Discard the request.
    Reject,
}

impl JoinAction {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl TryFrom<&str> for JoinAction {
    type Error = ParseJoinActionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseJoinActionError(value.to_owned())),
        }
    }
}

/// Partial update of a membership's flags. `None` leaves a flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStatusUpdate {
    /// New acceptance flag.
    pub accepted: Option<bool>,
    /// New admin flag.
    pub is_admin: Option<bool>,
}

impl MemberStatusUpdate {
    /// Creates an update that changes nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            accepted: None,
            is_admin: None,
        }
    }

    /// Sets the acceptance flag.
    #[must_use]
    pub const fn with_accepted(mut self, accepted: bool) -> Self {
        self.accepted = Some(accepted);
        self
    }

    /// Sets the admin flag.
    #[must_use]
    pub const fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = Some(is_admin);
        self
    }
}

/// Binding of a user to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    id: MembershipId,
    user_id: UserId,
    group_id: GroupId,
    is_admin: bool,
    accepted: bool,
    joined_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMembershipData {
    /// Persisted membership identifier.
    pub id: MembershipId,
    /// Member.
    pub user_id: UserId,
    /// Group.
    pub group_id: GroupId,
    /// Persisted admin flag.
    pub is_admin: bool,
    /// Persisted acceptance flag.
    pub accepted: bool,
    /// Persisted request or creation timestamp.
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    /// Creates the accepted admin membership of a group's creator.
    #[must_use]
    pub fn founder(user_id: UserId, group_id: GroupId, clock: &impl Clock) -> Self {
        Self {
            id: MembershipId::new(),
            user_id,
            group_id,
            is_admin: true,
            accepted: true,
            joined_at: clock.utc(),
        }
    }

    /// Creates a pending join request.
    #[must_use]
    pub fn request(user_id: UserId, group_id: GroupId, clock: &impl Clock) -> Self {
        Self {
            id: MembershipId::new(),
            user_id,
            group_id,
            is_admin: false,
            accepted: false,
            joined_at: clock.utc(),
        }
    }

    /// Reconstructs a membership from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedMembershipData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            group_id: data.group_id,
            is_admin: data.is_admin,
            accepted: data.accepted,
            joined_at: data.joined_at,
        }
    }

    /// Returns the membership identifier.
    #[must_use]
    pub const fn id(&self) -> MembershipId {
        self.id
    }

    /// Returns the member.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the group.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns the raw admin flag.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns the acceptance flag.
    #[must_use]
    pub const fn accepted(&self) -> bool {
        self.accepted
    }

    /// Returns the request or creation timestamp.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> MembershipState {
        if self.accepted {
            MembershipState::Active
        } else {
            MembershipState::Pending
        }
    }

    /// Accepted member of the group.
    #[must_use]
    pub const fn is_active_member(&self) -> bool {
        self.accepted
    }

    /// Accepted member holding admin rights.
    #[must_use]
    pub const fn is_active_admin(&self) -> bool {
        self.accepted && self.is_admin
    }

    /// Fails unless the membership is still pending.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::AlreadyAccepted`] for active memberships.
    pub fn ensure_pending(&self) -> Result<(), GroupDomainError> {
        if self.accepted {
            return Err(GroupDomainError::AlreadyAccepted {
                user_id: self.user_id,
                group_id: self.group_id,
            });
        }
        Ok(())
    }

    /// Approves a pending join request.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::AlreadyAccepted`] if the request was
    /// already approved.
    pub fn approve(&mut self) -> Result<(), GroupDomainError> {
        self.ensure_pending()?;
        self.accepted = true;
        Ok(())
    }

    /// Applies a partial flag update.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::CannotRevokeAcceptance`] when asked to
    /// move an active member back to pending, and
    /// [`GroupDomainError::PendingAdmin`] when promoting a member that stays
    /// pending. On error nothing changes.
    pub fn apply(&mut self, update: MemberStatusUpdate) -> Result<(), GroupDomainError> {
        let accepted = update.accepted.unwrap_or(self.accepted);
        let is_admin = update.is_admin.unwrap_or(self.is_admin);

        if self.accepted && !accepted {
            return Err(GroupDomainError::CannotRevokeAcceptance {
                user_id: self.user_id,
                group_id: self.group_id,
            });
        }
        if is_admin && !accepted {
            return Err(GroupDomainError::PendingAdmin {
                user_id: self.user_id,
                group_id: self.group_id,
            });
        }

        self.accepted = accepted;
        self.is_admin = is_admin;
        Ok(())
    }
}
