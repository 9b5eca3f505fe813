//! Slack announcements for newly created tasks.

use crate::group::domain::Group;
use crate::reminder::domain::{TaskNotice, render_announcement};
use crate::reminder::ports::ChatNotifier;
use crate::task::domain::Task;
use crate::task::ports::TaskAnnouncer;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// [`TaskAnnouncer`] posting to the group's Slack channel, when it has one.
#[derive(Clone)]
pub struct SlackTaskAnnouncer {
    notifier: Arc<dyn ChatNotifier>,
}

impl SlackTaskAnnouncer {
    /// Creates an announcer delivering through `notifier`.
    #[must_use]
    pub const fn new(notifier: Arc<dyn ChatNotifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl TaskAnnouncer for SlackTaskAnnouncer {
    async fn announce(&self, group: &Group, task: &Task) {
        let Some(slack) = group.slack() else {
            return;
        };
        let text = match render_announcement(&TaskNotice::from(task)) {
            Ok(text) => text,
            Err(err) => {
                warn!(task_id = %task.id(), error = %err, "announcement render failed");
                return;
            }
        };
        if let Err(err) = self
            .notifier
            .send_message(slack.bot_token(), slack.channel_id(), &text)
            .await
        {
            warn!(
                task_id = %task.id(),
                group_id = %group.id(),
                error = %err,
                "announcement delivery failed"
            );
        }
    }
}
