//! Membership lifecycle: group creation, join requests, role changes,
//! removal and dissolution of groups left without members.

use super::authorization::{AccessError, require_admin, require_member};
use crate::account::domain::UserId;
use crate::error::ErrorKind;
use crate::group::domain::{
    Group, GroupDomainError, GroupId, GroupName, JoinAction, MemberStatusUpdate, MemberView,
    Membership, ParseJoinActionError,
};
use crate::store::ports::{GroupStore, MembershipStore, Store, StoreError, StoreResult, UserStore};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for membership operations.
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Domain validation or state transition failed.
    #[error(transparent)]
    Domain(#[from] GroupDomainError),

    /// The join-request action is not recognized.
    #[error(transparent)]
    UnknownAction(#[from] ParseJoinActionError),

    /// The caller lacks the required membership level.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The creating user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The supplied name does not match the group.
    #[error("group {0} does not match the supplied name")]
    NameMismatch(GroupId),

    /// The (user, group) pair has no membership row.
    #[error("user {user_id} has no membership in group {group_id}")]
    MembershipNotFound {
        /// Target user.
        user_id: UserId,
        /// Group.
        group_id: GroupId,
    },

    /// The user is already an accepted member.
    #[error("user {user_id} is already a member of group {group_id}")]
    AlreadyMember {
        /// Requesting user.
        user_id: UserId,
        /// Group.
        group_id: GroupId,
    },

    /// The user already has a pending request.
    #[error("user {user_id} already requested to join group {group_id}")]
    AlreadyPending {
        /// Requesting user.
        user_id: UserId,
        /// Group.
        group_id: GroupId,
    },
}

impl MembershipError {
    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::UnknownAction(_) => ErrorKind::InvalidState,
            Self::Access(err) => err.kind(),
            Self::Store(err) => err.kind(),
            // A wrong name reads exactly like an unknown id.
            Self::GroupNotFound(_)
            | Self::UserNotFound(_)
            | Self::NameMismatch(_)
            | Self::MembershipNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyMember { .. } | Self::AlreadyPending { .. } => ErrorKind::Conflict,
        }
    }
}

/// Result type for membership service operations.
pub type MembershipResult<T> = Result<T, MembershipError>;

/// Outcome of resolving a join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JoinResolution {
    /// The request was approved.
    Approved(Membership),
    /// The request was rejected and its row deleted.
    Rejected {
        /// Rejected user.
        user_id: UserId,
        /// Group.
        group_id: GroupId,
    },
}

/// Outcome of removing a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRemoval {
    /// Removed user.
    pub user_id: UserId,
    /// Group left.
    pub group_id: GroupId,
    /// `true` when the removal emptied and therefore deleted the group.
    pub group_dissolved: bool,
}

/// Deletes `group_id` if it has no memberships left.
///
/// Must run in the same transaction as the membership deletion that may
/// have emptied the group. Deleting an already-deleted group is a no-op.
///
/// # Errors
///
/// Returns a store error when counting or deleting fails.
pub fn dissolve_if_empty<S>(store: &mut S, group_id: GroupId) -> StoreResult<bool>
where
    S: GroupStore + MembershipStore + ?Sized,
{
    if store.count_memberships(group_id)? > 0 {
        return Ok(false);
    }
    store.delete_group(group_id)
}

/// Membership lifecycle orchestration service.
#[derive(Clone)]
pub struct MembershipService<S, C>
where
    S: Store,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> MembershipService<S, C>
where
    S: Store,
    C: Clock + Send + Sync,
{
    /// Creates a new membership service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Creates a group with `creator` as its accepted admin.
    ///
    /// The group and the founding membership commit together.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Domain`] for an invalid name and
    /// [`MembershipError::UserNotFound`] when the creator does not exist.
    pub async fn create_group(&self, name: &str, creator: UserId) -> MembershipResult<Group> {
        let group = Group::new(GroupName::new(name)?, &*self.clock);
        let founder = Membership::founder(creator, group.id(), &*self.clock);

        let created = self
            .store
            .transaction(move |tx| -> MembershipResult<Group> {
                if tx.find_user(creator)?.is_none() {
                    return Err(MembershipError::UserNotFound(creator));
                }
                tx.insert_group(&group)?;
                tx.insert_membership(&founder)?;
                Ok(group)
            })
            .await?;
        info!(group_id = %created.id(), creator = %creator, "group created");
        Ok(created)
    }

    /// Files a pending join request for `user_id`.
    ///
    /// `name_confirmation` must equal the stored group name.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::GroupNotFound`],
    /// [`MembershipError::NameMismatch`], [`MembershipError::AlreadyMember`]
    /// or [`MembershipError::AlreadyPending`].
    pub async fn request_join(
        &self,
        group_id: GroupId,
        name_confirmation: &str,
        user_id: UserId,
    ) -> MembershipResult<Membership> {
        let confirmation = name_confirmation.to_owned();
        let request = Membership::request(user_id, group_id, &*self.clock);

        self.store
            .transaction(move |tx| -> MembershipResult<Membership> {
                let group = tx
                    .find_group(group_id)?
                    .ok_or(MembershipError::GroupNotFound(group_id))?;
                if !group.name().confirms(&confirmation) {
                    return Err(MembershipError::NameMismatch(group_id));
                }
                if let Some(existing) = tx.find_membership(user_id, group_id)? {
                    return Err(if existing.accepted() {
                        MembershipError::AlreadyMember { user_id, group_id }
                    } else {
                        MembershipError::AlreadyPending { user_id, group_id }
                    });
                }
                tx.insert_membership(&request)?;
                Ok(request)
            })
            .await
    }

    /// Approves or rejects a pending join request. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Access`] when `by` is not an admin,
    /// [`MembershipError::MembershipNotFound`] when there is no request, and
    /// [`GroupDomainError::AlreadyAccepted`] when it was already approved.
    pub async fn resolve_join_request(
        &self,
        group_id: GroupId,
        target: UserId,
        action: JoinAction,
        by: UserId,
    ) -> MembershipResult<JoinResolution> {
        self.store
            .transaction(move |tx| -> MembershipResult<JoinResolution> {
                require_admin(tx, by, group_id)?;
                let mut membership = tx.find_membership(target, group_id)?.ok_or(
                    MembershipError::MembershipNotFound {
                        user_id: target,
                        group_id,
                    },
                )?;
                membership.ensure_pending()?;
                match action {
                    JoinAction::Approve => {
                        membership.approve()?;
                        tx.update_membership(&membership)?;
                        Ok(JoinResolution::Approved(membership))
                    }
                    JoinAction::Reject => {
                        tx.delete_membership(target, group_id)?;
                        Ok(JoinResolution::Rejected {
                            user_id: target,
                            group_id,
                        })
                    }
                }
            })
            .await
    }

    /// Applies a partial flag update to a membership. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Access`] when `by` is not an admin,
    /// [`MembershipError::MembershipNotFound`] for an unknown target and
    /// [`MembershipError::Domain`] for forbidden transitions: promoting a
    /// member that stays pending, or revoking an acceptance.
    pub async fn update_member_status(
        &self,
        group_id: GroupId,
        target: UserId,
        update: MemberStatusUpdate,
        by: UserId,
    ) -> MembershipResult<Membership> {
        self.store
            .transaction(move |tx| -> MembershipResult<Membership> {
                require_admin(tx, by, group_id)?;
                let mut membership = tx.find_membership(target, group_id)?.ok_or(
                    MembershipError::MembershipNotFound {
                        user_id: target,
                        group_id,
                    },
                )?;
                membership.apply(update)?;
                tx.update_membership(&membership)?;
                Ok(membership)
            })
            .await
    }

    /// Removes `target` from the group. Leaving is always allowed; removing
    /// someone else requires admin rights. A group left without members is
    /// deleted in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::GroupNotFound`],
    /// [`MembershipError::Access`] or [`MembershipError::MembershipNotFound`].
    pub async fn remove_member(
        &self,
        group_id: GroupId,
        target: UserId,
        by: UserId,
    ) -> MembershipResult<MemberRemoval> {
        let removal = self
            .store
            .transaction(move |tx| -> MembershipResult<MemberRemoval> {
                if tx.lock_group(group_id)?.is_none() {
                    return Err(MembershipError::GroupNotFound(group_id));
                }
                if by != target {
                    require_admin(tx, by, group_id)?;
                }
                if !tx.delete_membership(target, group_id)? {
                    return Err(MembershipError::MembershipNotFound {
                        user_id: target,
                        group_id,
                    });
                }
                let group_dissolved = dissolve_if_empty(tx, group_id)?;
                Ok(MemberRemoval {
                    user_id: target,
                    group_id,
                    group_dissolved,
                })
            })
            .await?;
        if removal.group_dissolved {
            info!(group_id = %group_id, "group dissolved after its last member left");
        }
        Ok(removal)
    }

    /// Deletes a group and everything it owns. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Access`] when `by` is not an admin.
    pub async fn delete_group(&self, group_id: GroupId, by: UserId) -> MembershipResult<()> {
        self.store
            .transaction(move |tx| -> MembershipResult<()> {
                require_admin(tx, by, group_id)?;
                tx.lock_group(group_id)?;
                tx.delete_group(group_id)?;
                Ok(())
            })
            .await?;
        info!(group_id = %group_id, by = %by, "group deleted");
        Ok(())
    }

    /// Returns a group to one of its members.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::GroupNotFound`] or
    /// [`MembershipError::Access`].
    pub async fn get_group(&self, group_id: GroupId, by: UserId) -> MembershipResult<Group> {
        self.store
            .transaction(move |tx| -> MembershipResult<Group> {
                let group = tx
                    .find_group(group_id)?
                    .ok_or(MembershipError::GroupNotFound(group_id))?;
                require_member(tx, by, group_id)?;
                Ok(group)
            })
            .await
    }

    /// Lists a group's members, pending requests included, by join time.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::GroupNotFound`] or
    /// [`MembershipError::Access`].
    pub async fn list_members(
        &self,
        group_id: GroupId,
        by: UserId,
    ) -> MembershipResult<Vec<MemberView>> {
        self.store
            .transaction(move |tx| -> MembershipResult<Vec<MemberView>> {
                if tx.find_group(group_id)?.is_none() {
                    return Err(MembershipError::GroupNotFound(group_id));
                }
                require_member(tx, by, group_id)?;
                let mut members = Vec::new();
                for membership in tx.list_group_memberships(group_id)? {
                    if let Some(user) = tx.find_user(membership.user_id())? {
                        members.push(MemberView::new(&membership, user.display_name().as_str()));
                    }
                }
                Ok(members)
            })
            .await
    }

    /// Renames a group. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Domain`] for an invalid name,
    /// [`MembershipError::GroupNotFound`] or [`MembershipError::Access`].
    pub async fn rename_group(
        &self,
        group_id: GroupId,
        name: &str,
        by: UserId,
    ) -> MembershipResult<Group> {
        let new_name = GroupName::new(name)?;
        self.store
            .transaction(move |tx| -> MembershipResult<Group> {
                let mut group = tx
                    .find_group(group_id)?
                    .ok_or(MembershipError::GroupNotFound(group_id))?;
                require_admin(tx, by, group_id)?;
                group.rename(new_name);
                tx.update_group(&group)?;
                Ok(group)
            })
            .await
    }
}
