//! Daily reminder pass: find tasks due at each lookahead and notify their
//! groups.

use crate::error::ErrorKind;
use crate::reminder::domain::{
    DEFAULT_OFFSETS, NotificationRequest, TaskNotice, render_reminder,
};
use crate::reminder::ports::ChatNotifier;
use crate::store::ports::{Store, StoreError, StoreResult, TaskStore};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a reminder pass.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReminderError {
    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(err) => err.kind(),
        }
    }
}

/// Result type for reminder operations.
pub type ReminderResult<T> = Result<T, ReminderError>;

/// Tally of one reminder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    /// Messages the chat API accepted.
    pub sent: usize,
    /// Messages that failed to render or deliver.
    pub failed: usize,
    /// Due tasks whose lookahead has no phrasing.
    pub skipped: usize,
}

/// Collects a notification request for every task dated `today + offset`,
/// for each offset, whose group has Slack credentials.
///
/// Tasks in groups without credentials are left out. Negative or
/// overflowing offsets select nothing.
///
/// # Errors
///
/// Returns a store error when a read fails.
pub fn find_due_tasks<S>(
    store: &mut S,
    today: NaiveDate,
    offsets: &[i64],
) -> StoreResult<Vec<NotificationRequest>>
where
    S: TaskStore + ?Sized,
{
    let mut requests = Vec::new();
    for &days_left in offsets {
        let Some(target) = u64::try_from(days_left)
            .ok()
            .and_then(|days| today.checked_add_days(Days::new(days)))
        else {
            continue;
        };
        for (task, group) in store.list_tasks_on(target)? {
            let Some(slack) = group.slack() else {
                debug!(task_id = %task.id(), group_id = %group.id(), "group has no Slack integration");
                continue;
            };
            requests.push(NotificationRequest {
                group_id: group.id(),
                task_id: task.id(),
                slack: slack.clone(),
                days_left,
                notice: TaskNotice::from(&task),
            });
        }
    }
    Ok(requests)
}

/// Reminder orchestration service.
#[derive(Clone)]
pub struct ReminderService<S>
where
    S: Store,
{
    store: Arc<S>,
    notifier: Arc<dyn ChatNotifier>,
}

impl<S> ReminderService<S>
where
    S: Store,
{
    /// Creates a new reminder service.
    #[must_use]
    pub const fn new(store: Arc<S>, notifier: Arc<dyn ChatNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Sends the reminders due relative to `today`.
    ///
    /// A message that fails to render or deliver is logged and counted, and
    /// the pass carries on with the next one.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::Store`] when the due tasks cannot be read.
    pub async fn run(&self, today: NaiveDate) -> ReminderResult<ReminderReport> {
        let requests = self
            .store
            .transaction(move |tx| -> ReminderResult<Vec<NotificationRequest>> {
                Ok(find_due_tasks(tx, today, &DEFAULT_OFFSETS)?)
            })
            .await?;

        let mut report = ReminderReport::default();
        for request in requests {
            let text = match render_reminder(&request.notice, request.days_left) {
                Ok(Some(text)) => text,
                Ok(None) => {
                    report.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(task_id = %request.task_id, error = %err, "reminder render failed");
                    report.failed += 1;
                    continue;
                }
            };
            match self
                .notifier
                .send_message(request.slack.bot_token(), request.slack.channel_id(), &text)
                .await
            {
                Ok(()) => report.sent += 1,
                Err(err) => {
                    warn!(
                        task_id = %request.task_id,
                        group_id = %request.group_id,
                        error = %err,
                        "reminder delivery failed"
                    );
                    report.failed += 1;
                }
            }
        }
        info!(
            %today,
            sent = report.sent,
            failed = report.failed,
            skipped = report.skipped,
            "reminder pass finished"
        );
        Ok(report)
    }
}
