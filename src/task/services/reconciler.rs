//! Task-relation reconciliation.
//!
//! A relation row exists only while at least one of its fields differs from
//! the defaults. Every mutation creates the row on demand through
//! [`ensure_relation`] and finishes with [`cleanup_if_empty`], which deletes
//! a row that has decayed back to defaults.

use super::error::{TaskError, TaskResult};
use crate::account::domain::{UserId, UserIdentifier};
use crate::account::services::resolve_user;
use crate::group::services::{is_member, require_admin, require_member};
use crate::store::ports::{RelationStore, Store, StoreError, StoreResult, TaskStore};
use crate::task::domain::{
    ParseReactionError, Reaction, RelationOutcome, RelationState, Task, TaskId, TaskRelation,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Returns the relation of `user_id` to `task_id`, inserting a default row
/// when none exists.
///
/// The insert runs in a nested sub-transaction. When it loses a race
/// against a concurrent first touch of the same pair, the conflict is
/// discarded and the winner's row is read back instead.
///
/// # Errors
///
/// Returns [`TaskError::InternalConsistency`] when the insert conflicted yet
/// the re-read finds no row, and [`TaskError::Store`] for other failures.
pub fn ensure_relation<S>(store: &mut S, task_id: TaskId, user_id: UserId) -> TaskResult<TaskRelation>
where
    S: RelationStore + ?Sized,
{
    if let Some(existing) = store.find_relation(task_id, user_id)? {
        return Ok(existing);
    }
    let fresh = TaskRelation::blank(task_id, user_id);
    match store.insert_relation(&fresh) {
        Ok(()) => Ok(fresh),
        Err(StoreError::DuplicateRelation) => {
            debug!(task_id = %task_id, user_id = %user_id, "relation insert raced; re-reading");
            store.find_relation(task_id, user_id)?.ok_or_else(|| {
                error!(
                    task_id = %task_id,
                    user_id = %user_id,
                    "relation missing after a duplicate insert"
                );
                TaskError::InternalConsistency { task_id, user_id }
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Persists `relation`, or deletes it when every field is back to default.
///
/// Deleting a row that is already gone is a no-op, so calling this twice on
/// a decayed relation is safe.
///
/// # Errors
///
/// Returns a store error when the write fails.
pub fn cleanup_if_empty<S>(store: &mut S, relation: TaskRelation) -> StoreResult<RelationOutcome>
where
    S: RelationStore + ?Sized,
{
    if relation.is_empty() {
        let task_id = relation.task_id();
        let user_id = relation.user_id();
        store.delete_relation(task_id, user_id)?;
        return Ok(RelationOutcome::Removed { task_id, user_id });
    }
    store.update_relation(&relation)?;
    Ok(RelationOutcome::Current(relation))
}

/// Self-service reaction change. `None` leaves a field untouched; an empty
/// comment still counts as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionUpdate {
    /// New reaction.
    pub reaction: Option<Reaction>,
    /// New comment.
    pub comment: Option<String>,
}

impl ReactionUpdate {
    /// Builds an update from wire values.
    ///
    /// # Errors
    ///
    /// Returns [`ParseReactionError`] for an unknown reaction string.
    pub fn parse(reaction: Option<&str>, comment: Option<String>) -> Result<Self, ParseReactionError> {
        Ok(Self {
            reaction: reaction.map(Reaction::try_from).transpose()?,
            comment,
        })
    }
}

/// Reads a task or fails with [`TaskError::TaskNotFound`].
pub(super) fn load_task<S>(store: &mut S, task_id: TaskId) -> TaskResult<Task>
where
    S: TaskStore + ?Sized,
{
    store.find_task(task_id)?.ok_or(TaskError::TaskNotFound(task_id))
}

/// Assignment and reaction orchestration over task relations.
#[derive(Clone)]
pub struct RelationService<S>
where
    S: Store,
{
    store: Arc<S>,
}

impl<S> RelationService<S>
where
    S: Store,
{
    /// Creates a new relation service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Marks `target` as responsible (or no longer responsible) for a task.
    /// Admin of the task's group only; the target must be an accepted
    /// member of that group.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`], [`TaskError::Access`],
    /// [`TaskError::UserNotFound`] or [`TaskError::NotAMember`].
    pub async fn set_assignment(
        &self,
        task_id: TaskId,
        target: UserIdentifier,
        is_assigned: bool,
        by: UserId,
    ) -> TaskResult<RelationOutcome> {
        self.store
            .transaction(move |tx| -> TaskResult<RelationOutcome> {
                let group_id = load_task(tx, task_id)?.group_id();
                require_admin(tx, by, group_id)?;
                let user = resolve_user(tx, &target)?.ok_or(TaskError::UserNotFound(target))?;
                let user_id = user.id();
                if !is_member(tx, user_id, group_id)? {
                    return Err(TaskError::NotAMember { user_id, group_id });
                }
                let mut relation = ensure_relation(tx, task_id, user_id)?;
                relation.set_assigned(is_assigned);
                Ok(cleanup_if_empty(tx, relation)?)
            })
            .await
    }

    /// Records the caller's own reaction and comment on a task. Any accepted
    /// member of the task's group may do this.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] or [`TaskError::Access`].
    pub async fn set_reaction(
        &self,
        task_id: TaskId,
        by: UserId,
        update: ReactionUpdate,
    ) -> TaskResult<RelationOutcome> {
        self.store
            .transaction(move |tx| -> TaskResult<RelationOutcome> {
                let group_id = load_task(tx, task_id)?.group_id();
                require_member(tx, by, group_id)?;
                let mut relation = ensure_relation(tx, task_id, by)?;
                if let Some(reaction) = update.reaction {
                    relation.set_reaction(reaction);
                }
                if let Some(comment) = update.comment {
                    relation.set_comment(Some(comment));
                }
                Ok(cleanup_if_empty(tx, relation)?)
            })
            .await
    }

    /// Reads what `user_id`'s relation to a task currently holds; a missing
    /// row reads as all defaults. Members of the task's group only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] or [`TaskError::Access`].
    pub async fn relation_of(
        &self,
        task_id: TaskId,
        user_id: UserId,
        by: UserId,
    ) -> TaskResult<RelationState> {
        self.store
            .transaction(move |tx| -> TaskResult<RelationState> {
                let group_id = load_task(tx, task_id)?.group_id();
                require_member(tx, by, group_id)?;
                Ok(tx
                    .find_relation(task_id, user_id)?
                    .as_ref()
                    .map(RelationState::from)
                    .unwrap_or_default())
            })
            .await
    }
}
