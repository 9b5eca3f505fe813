//! Error types for group domain validation and parsing.

use super::GroupId;
use crate::account::domain::UserId;
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned while constructing group domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GroupDomainError {
    /// The group name is empty after trimming.
    #[error("group name must not be empty")]
    EmptyGroupName,

    /// The group name exceeds the persisted column width.
    #[error("group name exceeds {max} characters")]
    GroupNameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The Slack bot token or channel id is blank.
    #[error("slack integration requires a bot token and a channel id")]
    IncompleteSlackIntegration,

    /// The join request was already approved.
    #[error("membership of {user_id} in group {group_id} is already accepted")]
    AlreadyAccepted {
        /// Member whose request was already resolved.
        user_id: UserId,
        /// Group the request targets.
        group_id: GroupId,
    },

    /// An active member cannot be moved back to pending.
    #[error("membership of {user_id} in group {group_id} cannot return to pending")]
    CannotRevokeAcceptance {
        /// Member whose acceptance would be revoked.
        user_id: UserId,
        /// Group the membership belongs to.
        group_id: GroupId,
    },

    /// A pending member cannot be made an admin without being accepted.
    #[error("pending member {user_id} of group {group_id} cannot be made admin")]
    PendingAdmin {
        /// Pending member.
        user_id: UserId,
        /// Group the membership belongs to.
        group_id: GroupId,
    },
}

impl GroupDomainError {
    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyGroupName
            | Self::GroupNameTooLong { .. }
            | Self::IncompleteSlackIntegration => ErrorKind::Validation,
            Self::AlreadyAccepted { .. }
            | Self::CannotRevokeAcceptance { .. }
            | Self::PendingAdmin { .. } => ErrorKind::InvalidState,
        }
    }
}

/// Error returned while parsing a join-request action.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown join request action: {0}")]
pub struct ParseJoinActionError(pub String);
