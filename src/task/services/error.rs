//! Errors shared by the task services.

use crate::account::domain::{UserId, UserIdentifier};
use crate::error::ErrorKind;
use crate::group::domain::GroupId;
use crate::group::services::AccessError;
use crate::store::ports::StoreError;
use crate::task::domain::{ParseReactionError, TaskDomainError, TaskId, TemplateId};
use thiserror::Error;

/// Service-level errors for task, relation and template operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The reaction value is not recognized.
    #[error(transparent)]
    UnknownReaction(#[from] ParseReactionError),

    /// The caller lacks the required membership level.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    /// The template does not exist in the group.
    #[error("template not found: {0}")]
    TemplateNotFound(TemplateId),

    /// No user matches the identifier.
    #[error("user not found: {0:?}")]
    UserNotFound(UserIdentifier),

    /// The target user is not an accepted member of the task's group.
    #[error("user {user_id} is not a member of group {group_id}")]
    NotAMember {
        /// Target user.
        user_id: UserId,
        /// Task's group.
        group_id: GroupId,
    },

    /// A relation insert conflicted, yet no row is visible afterwards.
    #[error("relation for task {task_id} and user {user_id} vanished after an insert conflict")]
    InternalConsistency {
        /// Task side.
        task_id: TaskId,
        /// User side.
        user_id: UserId,
    },
}

impl TaskError {
    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::UnknownReaction(_) => ErrorKind::Validation,
            Self::Access(err) => err.kind(),
            Self::Store(err) => err.kind(),
            Self::TaskNotFound(_)
            | Self::GroupNotFound(_)
            | Self::TemplateNotFound(_)
            | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::NotAMember { .. } => ErrorKind::InvalidState,
            Self::InternalConsistency { .. } => ErrorKind::InternalConsistency,
        }
    }
}

/// Result type for task service operations.
pub type TaskResult<T> = Result<T, TaskError>;
