//! Read projections for calendar rendering and task detail pages.

use super::{Task, TaskId, TaskRelation};
use crate::group::domain::GroupId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Lightweight month-view row for a single group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Task identifier.
    pub task_id: TaskId,
    /// Task title.
    pub title: String,
    /// Calendar day.
    pub date: NaiveDate,
    /// Optional start.
    pub starts_at: Option<NaiveDateTime>,
    /// Optional end.
    pub ends_at: Option<NaiveDateTime>,
    /// Optional place.
    pub location: Option<String>,
}

impl From<&Task> for CalendarEntry {
    fn from(task: &Task) -> Self {
        let details = task.details();
        Self {
            task_id: task.id(),
            title: details.title.as_str().to_owned(),
            date: details.date,
            starts_at: details.starts_at,
            ends_at: details.ends_at,
            location: details.location.clone(),
        }
    }
}

/// Flattened cross-group row for a user's personal calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCalendarEntry {
    /// Task identifier.
    pub task_id: TaskId,
    /// Owning group.
    pub group_id: GroupId,
    /// Owning group's name.
    pub group_name: String,
    /// Task title.
    pub title: String,
    /// Calendar day.
    pub date: NaiveDate,
    /// Optional start.
    pub starts_at: Option<NaiveDateTime>,
    /// Optional end.
    pub ends_at: Option<NaiveDateTime>,
    /// Optional place.
    pub location: Option<String>,
}

impl GlobalCalendarEntry {
    /// Projects `task` under the name of its group.
    #[must_use]
    pub fn new(task: &Task, group_name: impl Into<String>) -> Self {
        let entry = CalendarEntry::from(task);
        Self {
            task_id: entry.task_id,
            group_id: task.group_id(),
            group_name: group_name.into(),
            title: entry.title,
            date: entry.date,
            starts_at: entry.starts_at,
            ends_at: entry.ends_at,
            location: entry.location,
        }
    }
}

/// A task with every relation row attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetail {
    /// The task.
    pub task: Task,
    /// Its non-default relations.
    pub relations: Vec<TaskRelation>,
}
