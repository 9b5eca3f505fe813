//! Membership-based authorization checks.
//!
//! The predicates are side-effect free and generic over any
//! [`MembershipStore`], so services call them inside their own transaction.

use crate::account::domain::UserId;
use crate::error::ErrorKind;
use crate::group::domain::GroupId;
use crate::store::ports::{MembershipStore, StoreError, StoreResult};
use thiserror::Error;

/// Returns `true` when `user_id` holds an accepted membership of `group_id`.
///
/// # Errors
///
/// Returns a store error when the membership cannot be read.
pub fn is_member<S>(store: &mut S, user_id: UserId, group_id: GroupId) -> StoreResult<bool>
where
    S: MembershipStore + ?Sized,
{
    Ok(store
        .find_membership(user_id, group_id)?
        .is_some_and(|membership| membership.is_active_member()))
}

/// Returns `true` when `user_id` is an accepted admin of `group_id`.
///
/// # Errors
///
/// Returns a store error when the membership cannot be read.
pub fn is_admin<S>(store: &mut S, user_id: UserId, group_id: GroupId) -> StoreResult<bool>
where
    S: MembershipStore + ?Sized,
{
    Ok(store
        .find_membership(user_id, group_id)?
        .is_some_and(|membership| membership.is_active_admin()))
}

/// Authorization failures raised by [`require_member`] and [`require_admin`].
#[derive(Debug, Clone, Error)]
pub enum AccessError {
    /// The caller is not an accepted member.
    #[error("user {user_id} is not a member of group {group_id}")]
    NotMember {
        /// Caller.
        user_id: UserId,
        /// Group checked.
        group_id: GroupId,
    },

    /// The caller is not an accepted admin.
    #[error("user {user_id} is not an admin of group {group_id}")]
    NotAdmin {
        /// Caller.
        user_id: UserId,
        /// Group checked.
        group_id: GroupId,
    },

    /// The check itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccessError {
    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotMember { .. } | Self::NotAdmin { .. } => ErrorKind::Forbidden,
            Self::Store(err) => err.kind(),
        }
    }
}

/// Fails unless `user_id` is an accepted member of `group_id`.
///
/// # Errors
///
/// Returns [`AccessError::NotMember`] when the check fails.
pub fn require_member<S>(store: &mut S, user_id: UserId, group_id: GroupId) -> Result<(), AccessError>
where
    S: MembershipStore + ?Sized,
{
    if is_member(store, user_id, group_id)? {
        Ok(())
    } else {
        Err(AccessError::NotMember { user_id, group_id })
    }
}

/// Fails unless `user_id` is an accepted admin of `group_id`.
///
/// # Errors
///
/// Returns [`AccessError::NotAdmin`] when the check fails.
pub fn require_admin<S>(store: &mut S, user_id: UserId, group_id: GroupId) -> Result<(), AccessError>
where
    S: MembershipStore + ?Sized,
{
    if is_admin(store, user_id, group_id)? {
        Ok(())
    } else {
        Err(AccessError::NotAdmin { user_id, group_id })
    }
}
