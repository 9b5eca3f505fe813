//! Reusable task presets managed by group admins.

use super::task::check_label;
use super::{TaskDomainError, TaskTitle, TemplateId};
use crate::group::domain::GroupId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const MAX_TEMPLATE_NAME_LENGTH: usize = 255;

/// Preset copied into the task form when creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTemplate {
    id: TemplateId,
    group_id: GroupId,
    name: String,
    title: TaskTitle,
    location: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

/// Fields supplied when creating a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
    /// Management label, e.g. "weekly meeting".
    pub name: String,
    /// Default task title.
    pub title: TaskTitle,
    /// Default location.
    pub location: Option<String>,
    /// Default description.
    pub description: Option<String>,
}

impl TemplateDraft {
    /// Creates a draft with no default location or description.
    #[must_use]
    pub fn new(name: impl Into<String>, title: TaskTitle) -> Self {
        Self {
            name: name.into(),
            title,
            location: None,
            description: None,
        }
    }

    /// Sets the default location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the default description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Parameter object for reconstructing a persisted template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTemplateData {
    /// Persisted identifier.
    pub id: TemplateId,
    /// Owning group.
    pub group_id: GroupId,
    /// Management label.
    pub name: String,
    /// Default title.
    pub title: TaskTitle,
    /// Default location.
    pub location: Option<String>,
    /// Default description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl TaskTemplate {
    /// Creates a template in `group_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTemplateName`] for a blank name,
    /// [`TaskDomainError::TitleTooLong`] when the name exceeds the column
    /// width and [`TaskDomainError::FieldTooLong`] for an over-long location.
    pub fn new(
        group_id: GroupId,
        draft: TemplateDraft,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(TaskDomainError::EmptyTemplateName);
        }
        if name.chars().count() > MAX_TEMPLATE_NAME_LENGTH {
            return Err(TaskDomainError::TitleTooLong {
                max: MAX_TEMPLATE_NAME_LENGTH,
            });
        }
        check_label("location", draft.location.as_deref())?;
        Ok(Self {
            id: TemplateId::new(),
            group_id,
            name: name.to_owned(),
            title: draft.title,
            location: draft.location,
            description: draft.description,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a template from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTemplateData) -> Self {
        Self {
            id: data.id,
            group_id: data.group_id,
            name: data.name,
            title: data.title,
            location: data.location,
            description: data.description,
            created_at: data.created_at,
        }
    }

    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> TemplateId {
        self.id
    }

    /// Returns the owning group.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns the management label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the default location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the default description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
