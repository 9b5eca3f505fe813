//! In-memory store for tests and local runs.
//!
//! One write lock is held for the whole of a transaction, so units of work
//! are fully serialized. Rollback restores a snapshot taken when the lock
//! was acquired. Cascades are applied explicitly by the delete methods.

use crate::account::domain::{EmailAddress, User, UserId};
use crate::group::domain::{Group, GroupId, Membership};
use crate::store::ports::{
    GroupStore, MembershipStore, RelationStore, Store, StoreError, StoreResult, StoreTransaction,
    TaskStore, TemplateStore, UserStore,
};
use crate::task::domain::{Task, TaskId, TaskQuery, TaskRelation, TaskTemplate, TemplateId};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    groups: HashMap<GroupId, Group>,
    memberships: HashMap<(UserId, GroupId), Membership>,
    tasks: HashMap<TaskId, Task>,
    relations: HashMap<(TaskId, UserId), TaskRelation>,
    templates: HashMap<TemplateId, TaskTemplate>,
}

impl InMemoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let mut guard = self
            .state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))?;
        let snapshot = guard.clone();
        let outcome = work(&mut MemoryTransaction { state: &mut guard });
        if outcome.is_err() {
            *guard = snapshot;
        }
        outcome
    }
}

struct MemoryTransaction<'a> {
    state: &'a mut StoreState,
}

impl MemoryTransaction<'_> {
    fn group_of_task(&self, task: &Task) -> Option<Group> {
        self.state.groups.get(&task.group_id()).cloned()
    }
}

fn by_date_then_creation(left: &Task, right: &Task) -> std::cmp::Ordering {
    left.date()
        .cmp(&right.date())
        .then_with(|| left.created_at().cmp(&right.created_at()))
}

fn by_join_time(memberships: &mut [Membership]) {
    memberships.sort_by(|left, right| {
        left.joined_at()
            .cmp(&right.joined_at())
            .then_with(|| left.user_id().cmp(&right.user_id()))
    });
}

impl UserStore for MemoryTransaction<'_> {
    fn insert_user(&mut self, user: &User) -> StoreResult<()> {
        if self
            .state
            .users
            .values()
            .any(|existing| existing.email() == user.email())
        {
            return Err(StoreError::DuplicateEmail);
        }
        self.state.users.insert(user.id(), user.clone());
        Ok(())
    }

    fn update_user(&mut self, user: &User) -> StoreResult<()> {
        if let Some(slot) = self.state.users.get_mut(&user.id()) {
            *slot = user.clone();
        }
        Ok(())
    }

    fn find_user(&mut self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.state.users.get(&id).cloned())
    }

    fn find_user_by_email(&mut self, email: &EmailAddress) -> StoreResult<Option<User>> {
        Ok(self
            .state
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    fn delete_user(&mut self, id: UserId) -> StoreResult<bool> {
        if self.state.users.remove(&id).is_none() {
            return Ok(false);
        }
        self.state.memberships.retain(|(user_id, _), _| *user_id != id);
        self.state.relations.retain(|(_, user_id), _| *user_id != id);
        Ok(true)
    }
}

impl GroupStore for MemoryTransaction<'_> {
    fn insert_group(&mut self, group: &Group) -> StoreResult<()> {
        self.state.groups.insert(group.id(), group.clone());
        Ok(())
    }

    fn update_group(&mut self, group: &Group) -> StoreResult<()> {
        if let Some(slot) = self.state.groups.get_mut(&group.id()) {
            *slot = group.clone();
        }
        Ok(())
    }

    fn find_group(&mut self, id: GroupId) -> StoreResult<Option<Group>> {
        Ok(self.state.groups.get(&id).cloned())
    }

    fn lock_group(&mut self, id: GroupId) -> StoreResult<Option<Group>> {
        // The transaction already holds the store-wide write lock.
        self.find_group(id)
    }

    fn delete_group(&mut self, id: GroupId) -> StoreResult<bool> {
        if self.state.groups.remove(&id).is_none() {
            return Ok(false);
        }
        let doomed: Vec<TaskId> = self
            .state
            .tasks
            .values()
            .filter(|task| task.group_id() == id)
            .map(Task::id)
            .collect();
        for task_id in doomed {
            self.delete_task(task_id)?;
        }
        self.state.memberships.retain(|(_, group_id), _| *group_id != id);
        self.state.templates.retain(|_, template| template.group_id() != id);
        Ok(true)
    }
}

impl MembershipStore for MemoryTransaction<'_> {
    fn insert_membership(&mut self, membership: &Membership) -> StoreResult<()> {
        let key = (membership.user_id(), membership.group_id());
        if self.state.memberships.contains_key(&key) {
            return Err(StoreError::DuplicateMembership);
        }
        self.state.memberships.insert(key, membership.clone());
        Ok(())
    }

    fn update_membership(&mut self, membership: &Membership) -> StoreResult<()> {
        let key = (membership.user_id(), membership.group_id());
        if let Some(slot) = self.state.memberships.get_mut(&key) {
            *slot = membership.clone();
        }
        Ok(())
    }

    fn find_membership(
        &mut self,
        user_id: UserId,
        group_id: GroupId,
    ) -> StoreResult<Option<Membership>> {
        Ok(self.state.memberships.get(&(user_id, group_id)).cloned())
    }

    fn delete_membership(&mut self, user_id: UserId, group_id: GroupId) -> StoreResult<bool> {
        Ok(self.state.memberships.remove(&(user_id, group_id)).is_some())
    }

    fn count_memberships(&mut self, group_id: GroupId) -> StoreResult<u64> {
        let count = self
            .state
            .memberships
            .keys()
            .filter(|(_, member_group)| *member_group == group_id)
            .count();
        u64::try_from(count).map_err(StoreError::persistence)
    }

    fn list_group_memberships(&mut self, group_id: GroupId) -> StoreResult<Vec<Membership>> {
        let mut memberships: Vec<Membership> = self
            .state
            .memberships
            .values()
            .filter(|membership| membership.group_id() == group_id)
            .cloned()
            .collect();
        by_join_time(&mut memberships);
        Ok(memberships)
    }

    fn list_user_memberships(&mut self, user_id: UserId) -> StoreResult<Vec<Membership>> {
        let mut memberships: Vec<Membership> = self
            .state
            .memberships
            .values()
            .filter(|membership| membership.user_id() == user_id)
            .cloned()
            .collect();
        by_join_time(&mut memberships);
        Ok(memberships)
    }
}

impl TaskStore for MemoryTransaction<'_> {
    fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        self.state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        if let Some(slot) = self.state.tasks.get_mut(&task.id()) {
            *slot = task.clone();
        }
        Ok(())
    }

    fn find_task(&mut self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.state.tasks.get(&id).cloned())
    }

    fn delete_task(&mut self, id: TaskId) -> StoreResult<bool> {
        if self.state.tasks.remove(&id).is_none() {
            return Ok(false);
        }
        self.state.relations.retain(|(task_id, _), _| *task_id != id);
        Ok(true)
    }

    fn query_tasks(
        &mut self,
        group_id: GroupId,
        caller: UserId,
        query: &TaskQuery,
    ) -> StoreResult<Vec<Task>> {
        let relations = &self.state.relations;
        let candidates = self
            .state
            .tasks
            .values()
            .filter(|task| task.group_id() == group_id)
            .cloned();
        Ok(query.apply(candidates, |task_id| relations.get(&(task_id, caller))))
    }

    fn list_tasks_between(
        &mut self,
        group_id: GroupId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .state
            .tasks
            .values()
            .filter(|task| task.group_id() == group_id && task.date() >= from && task.date() <= to)
            .cloned()
            .collect();
        tasks.sort_by(by_date_then_creation);
        Ok(tasks)
    }

    fn list_involved_tasks(
        &mut self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<(Task, Group)>> {
        let mut tasks: Vec<Task> = self
            .state
            .tasks
            .values()
            .filter(|task| task.date() >= from && task.date() <= to)
            .filter(|task| {
                self.state
                    .memberships
                    .get(&(user_id, task.group_id()))
                    .is_some_and(Membership::is_active_member)
            })
            .filter(|task| {
                self.state
                    .relations
                    .get(&(task.id(), user_id))
                    .is_some_and(TaskRelation::is_involved)
            })
            .cloned()
            .collect();
        tasks.sort_by(by_date_then_creation);
        Ok(tasks
            .into_iter()
            .filter_map(|task| self.group_of_task(&task).map(|group| (task, group)))
            .collect())
    }

    fn list_tasks_on(&mut self, date: NaiveDate) -> StoreResult<Vec<(Task, Group)>> {
        let mut tasks: Vec<Task> = self
            .state
            .tasks
            .values()
            .filter(|task| task.date() == date)
            .cloned()
            .collect();
        tasks.sort_by(by_date_then_creation);
        Ok(tasks
            .into_iter()
            .filter_map(|task| self.group_of_task(&task).map(|group| (task, group)))
            .collect())
    }
}

impl RelationStore for MemoryTransaction<'_> {
    fn find_relation(
        &mut self,
        task_id: TaskId,
        user_id: UserId,
    ) -> StoreResult<Option<TaskRelation>> {
        Ok(self.state.relations.get(&(task_id, user_id)).cloned())
    }

    fn insert_relation(&mut self, relation: &TaskRelation) -> StoreResult<()> {
        let key = (relation.task_id(), relation.user_id());
        if self.state.relations.contains_key(&key) {
            return Err(StoreError::DuplicateRelation);
        }
        self.state.relations.insert(key, relation.clone());
        Ok(())
    }

    fn update_relation(&mut self, relation: &TaskRelation) -> StoreResult<()> {
        let key = (relation.task_id(), relation.user_id());
        if let Some(slot) = self.state.relations.get_mut(&key) {
            *slot = relation.clone();
        }
        Ok(())
    }

    fn delete_relation(&mut self, task_id: TaskId, user_id: UserId) -> StoreResult<bool> {
        Ok(self.state.relations.remove(&(task_id, user_id)).is_some())
    }

    fn list_task_relations(&mut self, task_id: TaskId) -> StoreResult<Vec<TaskRelation>> {
        let mut relations: Vec<TaskRelation> = self
            .state
            .relations
            .values()
            .filter(|relation| relation.task_id() == task_id)
            .cloned()
            .collect();
        relations.sort_by_key(TaskRelation::user_id);
        Ok(relations)
    }
}

impl TemplateStore for MemoryTransaction<'_> {
    fn insert_template(&mut self, template: &TaskTemplate) -> StoreResult<()> {
        self.state.templates.insert(template.id(), template.clone());
        Ok(())
    }

    fn find_template(&mut self, id: TemplateId) -> StoreResult<Option<TaskTemplate>> {
        Ok(self.state.templates.get(&id).cloned())
    }

    fn list_templates(&mut self, group_id: GroupId) -> StoreResult<Vec<TaskTemplate>> {
        let mut templates: Vec<TaskTemplate> = self
            .state
            .templates
            .values()
            .filter(|template| template.group_id() == group_id)
            .cloned()
            .collect();
        templates.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(templates)
    }

    fn delete_template(&mut self, id: TemplateId) -> StoreResult<bool> {
        Ok(self.state.templates.remove(&id).is_some())
    }
}
