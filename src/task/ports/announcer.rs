//! Outbound notification hook fired after a task is created.

use crate::group::domain::Group;
use crate::task::domain::Task;
use async_trait::async_trait;

/// Publishes freshly created tasks to the owning group's chat channel.
///
/// Implementations are best-effort: delivery failures are logged and never
/// reported back, so task creation cannot fail because of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskAnnouncer: Send + Sync {
    /// Announces `task` to `group`.
    async fn announce(&self, group: &Group, task: &Task);
}
