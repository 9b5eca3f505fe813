//! Task aggregate: a dated group event, optionally carrying a deadline.

use super::{TaskDomainError, TaskId, TaskTitle};
use crate::group::domain::GroupId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Workflow label given to new tasks when none is supplied.
pub const DEFAULT_STATUS: &str = "未着手";

/// Column width of the short text fields `location` and `status`.
pub(crate) const MAX_LABEL_LENGTH: usize = 255;

/// Descriptive fields of a task, used when creating one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// Task title.
    pub title: TaskTitle,
    /// Calendar day the task falls on.
    pub date: NaiveDate,
    /// Optional start of the time span.
    pub starts_at: Option<NaiveDateTime>,
    /// Optional end of the time span.
    pub ends_at: Option<NaiveDateTime>,
    /// Optional place.
    pub location: Option<String>,
    /// Optional free-text description.
    pub description: Option<String>,
    /// `true` for deadline-bearing tasks, `false` for plain events.
    pub is_task: bool,
    /// Free-text workflow label.
    pub status: String,
}

impl TaskDetails {
    /// Creates details for a plain event on `date`.
    #[must_use]
    pub fn new(title: TaskTitle, date: NaiveDate) -> Self {
        Self {
            title,
            date,
            starts_at: None,
            ends_at: None,
            location: None,
            description: None,
            is_task: false,
            status: DEFAULT_STATUS.to_owned(),
        }
    }

    /// Sets the time span.
    #[must_use]
    pub const fn with_span(
        mut self,
        starts_at: Option<NaiveDateTime>,
        ends_at: Option<NaiveDateTime>,
    ) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the entry as a deadline-bearing task.
    #[must_use]
    pub const fn as_task(mut self) -> Self {
        self.is_task = true;
        self
    }

    /// Sets the workflow label; blank labels keep the default.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let label = status.into();
        if !label.trim().is_empty() {
            self.status = label;
        }
        self
    }
}

/// Partial update of a task. `None` leaves a field untouched; the nested
/// `Option` on clearable fields distinguishes "clear" from "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title; blank values are ignored.
    pub title: Option<String>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New or cleared start.
    pub starts_at: Option<Option<NaiveDateTime>>,
    /// New or cleared end.
    pub ends_at: Option<Option<NaiveDateTime>>,
    /// New or cleared location.
    pub location: Option<Option<String>>,
    /// New or cleared description.
    pub description: Option<Option<String>>,
    /// New task/event flag.
    pub is_task: Option<bool>,
    /// New status; blank values are ignored.
    pub status: Option<String>,
}

/// Dated entry on a group calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    group_id: GroupId,
    details: TaskDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning group.
    pub group_id: GroupId,
    /// Persisted descriptive fields.
    pub details: TaskDetails,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task in `group_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTimeSpan`] when the span ends before
    /// it starts and [`TaskDomainError::FieldTooLong`] when the location or
    /// status exceeds 255 characters.
    pub fn new(
        group_id: GroupId,
        details: TaskDetails,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        check_details(&details)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            group_id,
            details,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            group_id: data.group_id,
            details: data.details,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning group.
    #[must_use]
    pub const fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.details.title
    }

    /// Returns the calendar day.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.details.date
    }

    /// Returns `true` for deadline-bearing tasks.
    #[must_use]
    pub const fn is_task(&self) -> bool {
        self.details.is_task
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update.
    ///
    /// Blank titles and statuses are ignored rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTimeSpan`] when the resulting span
    /// ends before it starts and [`TaskDomainError::FieldTooLong`] for an
    /// over-long location or status. On error nothing changes.
    pub fn apply(&mut self, patch: TaskPatch, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let mut next = self.details.clone();
        if let Some(title) = patch.title.filter(|value| !value.trim().is_empty()) {
            next.title = TaskTitle::new(title)?;
        }
        if let Some(date) = patch.date {
            next.date = date;
        }
        if let Some(starts_at) = patch.starts_at {
            next.starts_at = starts_at;
        }
        if let Some(ends_at) = patch.ends_at {
            next.ends_at = ends_at;
        }
        if let Some(location) = patch.location {
            next.location = location;
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(is_task) = patch.is_task {
            next.is_task = is_task;
        }
        if let Some(status) = patch.status.filter(|value| !value.trim().is_empty()) {
            next.status = status;
        }
        check_details(&next)?;

        self.details = next;
        self.updated_at = clock.utc();
        Ok(())
    }
}

fn check_details(details: &TaskDetails) -> Result<(), TaskDomainError> {
    check_label("location", details.location.as_deref())?;
    check_label("status", Some(details.status.as_str()))?;
    check_span(details.starts_at, details.ends_at)
}

/// Rejects a label longer than the column that stores it.
pub(crate) fn check_label(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), TaskDomainError> {
    match value {
        Some(text) if text.chars().count() > MAX_LABEL_LENGTH => {
            Err(TaskDomainError::FieldTooLong {
                field,
                max: MAX_LABEL_LENGTH,
            })
        }
        _ => Ok(()),
    }
}

fn check_span(
    starts_at: Option<NaiveDateTime>,
    ends_at: Option<NaiveDateTime>,
) -> Result<(), TaskDomainError> {
    match (starts_at, ends_at) {
        (Some(start), Some(end)) if end < start => Err(TaskDomainError::InvalidTimeSpan),
        _ => Ok(()),
    }
}
