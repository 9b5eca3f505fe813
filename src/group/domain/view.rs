//! Read projections joining memberships with users or groups.

use super::{GroupId, Membership};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A group's member as listed to other members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    /// Member.
    pub user_id: UserId,
    /// Member's display name.
    pub display_name: String,
    /// Admin flag.
    pub is_admin: bool,
    /// `false` while the join request is pending.
    pub accepted: bool,
    /// Request or creation timestamp.
    pub joined_at: DateTime<Utc>,
}

impl MemberView {
    /// Joins a membership with its user's display name.
    #[must_use]
    pub fn new(membership: &Membership, display_name: impl Into<String>) -> Self {
        Self {
            user_id: membership.user_id(),
            display_name: display_name.into(),
            is_admin: membership.is_admin(),
            accepted: membership.accepted(),
            joined_at: membership.joined_at(),
        }
    }
}

/// One of a user's own memberships, with the group's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembershipView {
    /// Group.
    pub group_id: GroupId,
    /// Group name.
    pub group_name: String,
    /// Admin flag.
    pub is_admin: bool,
    /// `false` while the join request is pending.
    pub accepted: bool,
    /// Request or creation timestamp.
    pub joined_at: DateTime<Utc>,
}

impl GroupMembershipView {
    /// Joins a membership with its group's name.
    #[must_use]
    pub fn new(membership: &Membership, group_name: impl Into<String>) -> Self {
        Self {
            group_id: membership.group_id(),
            group_name: group_name.into(),
            is_admin: membership.is_admin(),
            accepted: membership.accepted(),
            joined_at: membership.joined_at(),
        }
    }
}
