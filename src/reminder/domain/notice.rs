//! Data handed to the Slack formatter.

use crate::group::domain::{GroupId, SlackIntegration};
use crate::task::domain::{Task, TaskId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// The task fields a chat message mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskNotice {
    /// Task title.
    pub title: String,
    /// Calendar day.
    pub date: NaiveDate,
    /// Optional start.
    pub starts_at: Option<NaiveDateTime>,
    /// Optional end.
    pub ends_at: Option<NaiveDateTime>,
    /// Deadline-bearing task rather than plain event.
    pub is_task: bool,
}

impl From<&Task> for TaskNotice {
    fn from(task: &Task) -> Self {
        let details = task.details();
        Self {
            title: details.title.as_str().to_owned(),
            date: details.date,
            starts_at: details.starts_at,
            ends_at: details.ends_at,
            is_task: details.is_task,
        }
    }
}

/// One reminder to deliver to a group's Slack channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Group owning the task.
    pub group_id: GroupId,
    /// Task being reminded of.
    pub task_id: TaskId,
    /// Where to deliver.
    pub slack: SlackIntegration,
    /// Days between the run date and the task date.
    pub days_left: i64,
    /// Message content.
    pub notice: TaskNotice,
}
