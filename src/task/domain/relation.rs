//! Sparse per-(task, user) record of assignment, reaction and comment.
//!
//! A relation whose fields are all at their defaults carries no information
//! and is never persisted; [`TaskRelation::is_empty`] is the test the
//! reconciler applies after every mutation.

use super::{ParseReactionError, RelationId, TaskId};
use crate::account::domain::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A member's response to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    /// No response recorded.
    #[default]
    #[serde(rename = "no-reaction")]
    NoReaction,
    /// Will take part.
    #[serde(rename = "join")]
    Join,
    /// Will not take part.
    #[serde(rename = "absent")]
    Absent,
    /// Not decided yet.
    #[serde(rename = "undecided")]
    Undecided,
}

impl Reaction {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoReaction => "no-reaction",
            Self::Join => "join",
            Self::Absent => "absent",
            Self::Undecided => "undecided",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Reaction {
    type Error = ParseReactionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "no-reaction" => Ok(Self::NoReaction),
            "join" => Ok(Self::Join),
            "absent" => Ok(Self::Absent),
            "undecided" => Ok(Self::Undecided),
            _ => Err(ParseReactionError(value.to_owned())),
        }
    }
}

/// Relation row between a task and a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRelation {
    id: RelationId,
    task_id: TaskId,
    user_id: UserId,
    is_assigned: bool,
    reaction: Reaction,
    comment: Option<String>,
}

/// Parameter object for reconstructing a persisted relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedRelationData {
    /// Persisted relation identifier.
    pub id: RelationId,
    /// Task side of the pair.
    pub task_id: TaskId,
    /// User side of the pair.
    pub user_id: UserId,
    /// Persisted assignment flag.
    pub is_assigned: bool,
    /// Persisted reaction.
    pub reaction: Reaction,
    /// Persisted comment.
    pub comment: Option<String>,
}

impl TaskRelation {
    /// Creates an all-default relation for `(task_id, user_id)`.
    #[must_use]
    pub fn blank(task_id: TaskId, user_id: UserId) -> Self {
        Self {
            id: RelationId::new(),
            task_id,
            user_id,
            is_assigned: false,
            reaction: Reaction::NoReaction,
            comment: None,
        }
    }

    /// Reconstructs a relation from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRelationData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            user_id: data.user_id,
            is_assigned: data.is_assigned,
            reaction: data.reaction,
            comment: data.comment,
        }
    }

    /// Returns the relation identifier.
    #[must_use]
    pub const fn id(&self) -> RelationId {
        self.id
    }

    /// Returns the task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the admin-set responsibility flag.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.is_assigned
    }

    /// Returns the reaction.
    #[must_use]
    pub const fn reaction(&self) -> Reaction {
        self.reaction
    }

    /// Returns the comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Sets the responsibility flag.
    pub const fn set_assigned(&mut self, is_assigned: bool) {
        self.is_assigned = is_assigned;
    }

    /// Sets the reaction.
    pub const fn set_reaction(&mut self, reaction: Reaction) {
        self.reaction = reaction;
    }

    /// Replaces the comment. An empty string is kept as given.
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    /// Returns `true` when every field holds its default and the row must
    /// not persist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.is_assigned
            && self.reaction == Reaction::NoReaction
            && self.comment.as_deref().is_none_or(|text| text.trim().is_empty())
    }

    /// Returns `true` when the user is responsible for or joining the task.
    #[must_use]
    pub fn is_involved(&self) -> bool {
        self.is_assigned || self.reaction == Reaction::Join
    }
}

/// Read view of a (task, user) pair; absence of a row reads as defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationState {
    /// Responsibility flag.
    pub is_assigned: bool,
    /// Reaction.
    pub reaction: Reaction,
    /// Comment.
    pub comment: Option<String>,
}

impl From<&TaskRelation> for RelationState {
    fn from(relation: &TaskRelation) -> Self {
        Self {
            is_assigned: relation.is_assigned,
            reaction: relation.reaction,
            comment: relation.comment.clone(),
        }
    }
}

/// Result of a relation mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RelationOutcome {
    /// The row exists with the returned contents.
    Current(TaskRelation),
    /// The row decayed to defaults and was deleted.
    Removed {
        /// Task side of the pair.
        task_id: TaskId,
        /// User side of the pair.
        user_id: UserId,
    },
}

impl RelationOutcome {
    /// Returns the surviving relation, if any.
    #[must_use]
    pub const fn relation(&self) -> Option<&TaskRelation> {
        match self {
            Self::Current(relation) => Some(relation),
            Self::Removed { .. } => None,
        }
    }

    /// Returns the field values the pair now reads as.
    #[must_use]
    pub fn state(&self) -> RelationState {
        self.relation().map(RelationState::from).unwrap_or_default()
    }

    /// Returns `true` when the row was deleted.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self, Self::Removed { .. })
    }
}
