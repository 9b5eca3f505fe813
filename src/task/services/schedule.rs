//! Task CRUD, filtered listings and calendar projections.

use super::error::{TaskError, TaskResult};
use super::reconciler::load_task;
use crate::account::domain::UserId;
use crate::group::domain::{Group, GroupId};
use crate::group::services::{require_admin, require_member};
use crate::store::ports::{GroupStore, RelationStore, Store, StoreTransaction, TaskStore};
use crate::task::domain::{
    CalendarEntry, GlobalCalendarEntry, MonthRange, Task, TaskDetail, TaskDetails, TaskId,
    TaskPatch, TaskQuery,
};
use crate::task::ports::TaskAnnouncer;
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

fn load_group(tx: &mut dyn StoreTransaction, group_id: GroupId) -> TaskResult<Group> {
    tx.find_group(group_id)?
        .ok_or(TaskError::GroupNotFound(group_id))
}

fn with_relations(tx: &mut dyn StoreTransaction, task: Task) -> TaskResult<TaskDetail> {
    let relations = tx.list_task_relations(task.id())?;
    Ok(TaskDetail { task, relations })
}

/// Runs the announcement off the request path. A panicking announcer is
/// logged and otherwise ignored.
fn spawn_announcement(announcer: Arc<dyn TaskAnnouncer>, group: Group, task: Task) {
    let task_id = task.id();
    let delivery = tokio::spawn(async move { announcer.announce(&group, &task).await });
    tokio::spawn(async move {
        if let Err(err) = delivery.await {
            warn!(task_id = %task_id, error = %err, "task announcement aborted");
        }
    });
}

/// Group task orchestration service.
///
/// Writes are restricted to group admins, reads to accepted members.
#[derive(Clone)]
pub struct TaskService<S, C>
where
    S: Store,
    C: Clock + Send + Sync + 'static,
{
    store: Arc<S>,
    clock: Arc<C>,
    announcer: Option<Arc<dyn TaskAnnouncer>>,
}

impl<S, C> TaskService<S, C>
where
    S: Store,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new task service without announcements.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            announcer: None,
        }
    }

    /// Announces every created task through `announcer`.
    #[must_use]
    pub fn with_announcer(mut self, announcer: Arc<dyn TaskAnnouncer>) -> Self {
        self.announcer = Some(announcer);
        self
    }

    /// Creates a task in `group_id`. Admin only.
    ///
    /// Once the task is committed it is handed to the announcer on a
    /// background task; the call returns without waiting for delivery.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Domain`] for an inverted time span,
    /// [`TaskError::GroupNotFound`] or [`TaskError::Access`].
    pub async fn create_task(
        &self,
        group_id: GroupId,
        details: TaskDetails,
        by: UserId,
    ) -> TaskResult<Task> {
        let task = Task::new(group_id, details, &*self.clock)?;
        let (created, group) = self
            .store
            .transaction(move |tx| -> TaskResult<(Task, Group)> {
                let group = load_group(tx, group_id)?;
                require_admin(tx, by, group_id)?;
                tx.insert_task(&task)?;
                Ok((task, group))
            })
            .await?;
        info!(task_id = %created.id(), group_id = %group_id, by = %by, "task created");
        if let Some(announcer) = &self.announcer {
            spawn_announcement(Arc::clone(announcer), group, created.clone());
        }
        Ok(created)
    }

    /// Returns a task with its relations. Members only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] or [`TaskError::Access`].
    pub async fn get_task(&self, task_id: TaskId, by: UserId) -> TaskResult<TaskDetail> {
        self.store
            .transaction(move |tx| -> TaskResult<TaskDetail> {
                let task = load_task(tx, task_id)?;
                require_member(tx, by, task.group_id())?;
                with_relations(tx, task)
            })
            .await
    }

    /// Applies a partial update to a task. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`], [`TaskError::Access`] or
    /// [`TaskError::Domain`] when the patched span is inverted.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        patch: TaskPatch,
        by: UserId,
    ) -> TaskResult<Task> {
        let clock = Arc::clone(&self.clock);
        self.store
            .transaction(move |tx| -> TaskResult<Task> {
                let mut task = load_task(tx, task_id)?;
                require_admin(tx, by, task.group_id())?;
                task.apply(patch, &*clock)?;
                tx.update_task(&task)?;
                Ok(task)
            })
            .await
    }

    /// Deletes a task and its relations. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TaskNotFound`] or [`TaskError::Access`].
    pub async fn delete_task(&self, task_id: TaskId, by: UserId) -> TaskResult<()> {
        self.store
            .transaction(move |tx| -> TaskResult<()> {
                let task = load_task(tx, task_id)?;
                require_admin(tx, by, task.group_id())?;
                tx.delete_task(task_id)?;
                Ok(())
            })
            .await?;
        info!(task_id = %task_id, by = %by, "task deleted");
        Ok(())
    }

    /// Lists a group's tasks narrowed by `query`, each with its relations.
    /// Members only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::GroupNotFound`] or [`TaskError::Access`].
    pub async fn list_tasks(
        &self,
        group_id: GroupId,
        query: TaskQuery,
        by: UserId,
    ) -> TaskResult<Vec<TaskDetail>> {
        self.store
            .transaction(move |tx| -> TaskResult<Vec<TaskDetail>> {
                load_group(tx, group_id)?;
                require_member(tx, by, group_id)?;
                tx.query_tasks(group_id, by, &query)?
                    .into_iter()
                    .map(|task| with_relations(tx, task))
                    .collect()
            })
            .await
    }

    /// Returns the calendar entries of a group for one month, date
    /// ascending. Members only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Domain`] for an invalid month,
    /// [`TaskError::GroupNotFound`] or [`TaskError::Access`].
    pub async fn calendar_month(
        &self,
        group_id: GroupId,
        year: i32,
        month: u32,
        by: UserId,
    ) -> TaskResult<Vec<CalendarEntry>> {
        let range = MonthRange::new(year, month)?;
        self.store
            .transaction(move |tx| -> TaskResult<Vec<CalendarEntry>> {
                load_group(tx, group_id)?;
                require_member(tx, by, group_id)?;
                Ok(tx
                    .list_tasks_between(group_id, range.first(), range.last())?
                    .iter()
                    .map(CalendarEntry::from)
                    .collect())
            })
            .await
    }

    /// Returns, across every group the user has joined, the tasks of one
    /// month the user is assigned to or joins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Domain`] for an invalid month.
    pub async fn list_my_global_tasks(
        &self,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> TaskResult<Vec<GlobalCalendarEntry>> {
        let range = MonthRange::new(year, month)?;
        self.store
            .transaction(move |tx| -> TaskResult<Vec<GlobalCalendarEntry>> {
                Ok(tx
                    .list_involved_tasks(user_id, range.first(), range.last())?
                    .iter()
                    .map(|(task, group)| GlobalCalendarEntry::new(task, group.name().as_str()))
                    .collect())
            })
            .await
    }
}
