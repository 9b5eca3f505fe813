//! Per-entity repository operations available inside a transaction.
//!
//! Every `delete_*` method reports whether a row was removed and treats a
//! missing row as a no-op.

use super::StoreResult;
use crate::account::domain::{EmailAddress, User, UserId};
use crate::group::domain::{Group, GroupId, Membership};
use crate::task::domain::{Task, TaskId, TaskQuery, TaskRelation, TaskTemplate, TemplateId};
use chrono::NaiveDate;

/// User persistence.
#[cfg_attr(test, mockall::automock)]
pub trait UserStore {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::DuplicateEmail`] when the email is taken.
    fn insert_user(&mut self, user: &User) -> StoreResult<()>;

    /// Persists changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn update_user(&mut self, user: &User) -> StoreResult<()>;

    /// Finds a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn find_user(&mut self, id: UserId) -> StoreResult<Option<User>>;

    /// Finds a user by login email.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn find_user_by_email(&mut self, email: &EmailAddress) -> StoreResult<Option<User>>;

    /// Deletes a user together with its memberships and relations.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn delete_user(&mut self, id: UserId) -> StoreResult<bool>;
}

/// Group persistence.
#[cfg_attr(test, mockall::automock)]
pub trait GroupStore {
    /// Stores a new group.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn insert_group(&mut self, group: &Group) -> StoreResult<()>;

    /// Persists changes to an existing group.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn update_group(&mut self, group: &Group) -> StoreResult<()>;

    /// Finds a group by identifier.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn find_group(&mut self, id: GroupId) -> StoreResult<Option<Group>>;

    /// Finds a group and holds a row lock on it until the transaction ends,
    /// serializing concurrent membership removals on that group.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn lock_group(&mut self, id: GroupId) -> StoreResult<Option<Group>>;

    /// Deletes a group with its memberships, tasks, relations and templates.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn delete_group(&mut self, id: GroupId) -> StoreResult<bool>;
}

/// Membership persistence.
#[cfg_attr(test, mockall::automock)]
pub trait MembershipStore {
    /// Stores a new membership.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::DuplicateMembership`] when the pair
    /// already has a row.
    fn insert_membership(&mut self, membership: &Membership) -> StoreResult<()>;

    /// Persists changes to an existing membership.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn update_membership(&mut self, membership: &Membership) -> StoreResult<()>;

    /// Finds the membership of `user_id` in `group_id`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn find_membership(
        &mut self,
        user_id: UserId,
        group_id: GroupId,
    ) -> StoreResult<Option<Membership>>;

    /// Deletes the membership of `user_id` in `group_id`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn delete_membership(&mut self, user_id: UserId, group_id: GroupId) -> StoreResult<bool>;

    /// Counts memberships of a group, pending ones included, as seen by this
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn count_memberships(&mut self, group_id: GroupId) -> StoreResult<u64>;

    /// Lists a group's memberships ordered by join time.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn list_group_memberships(&mut self, group_id: GroupId) -> StoreResult<Vec<Membership>>;

    /// Lists a user's memberships ordered by join time.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn list_user_memberships(&mut self, user_id: UserId) -> StoreResult<Vec<Membership>>;
}

/// Task persistence and queries.
#[cfg_attr(test, mockall::automock)]
pub trait TaskStore {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn insert_task(&mut self, task: &Task) -> StoreResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn update_task(&mut self, task: &Task) -> StoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn find_task(&mut self, id: TaskId) -> StoreResult<Option<Task>>;

    /// Deletes a task and its relations.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn delete_task(&mut self, id: TaskId) -> StoreResult<bool>;

    /// Lists a group's tasks matching `query`, evaluated relative to
    /// `caller`, filtered, ordered and paginated.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn query_tasks(
        &mut self,
        group_id: GroupId,
        caller: UserId,
        query: &TaskQuery,
    ) -> StoreResult<Vec<Task>>;

    /// Lists a group's tasks dated within `[from, to]`, date ascending.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn list_tasks_between(
        &mut self,
        group_id: GroupId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Task>>;

    /// Lists tasks in `[from, to]`, across every group `user_id` is an
    /// accepted member of, that the user is assigned to or joins. Each task
    /// comes with its group; date ascending.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn list_involved_tasks(
        &mut self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<(Task, Group)>>;

    /// Lists every task dated `date`, each with its group.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn list_tasks_on(&mut self, date: NaiveDate) -> StoreResult<Vec<(Task, Group)>>;
}

/// Task relation persistence.
#[cfg_attr(test, mockall::automock)]
pub trait RelationStore {
    /// Finds the relation of `user_id` to `task_id`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn find_relation(
        &mut self,
        task_id: TaskId,
        user_id: UserId,
    ) -> StoreResult<Option<TaskRelation>>;

    /// Stores a new relation inside a nested sub-transaction, so a conflict
    /// leaves the enclosing transaction usable.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::DuplicateRelation`] when the pair already
    /// has a row.
    fn insert_relation(&mut self, relation: &TaskRelation) -> StoreResult<()>;

    /// Persists changes to an existing relation.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn update_relation(&mut self, relation: &TaskRelation) -> StoreResult<()>;

    /// Deletes the relation of `user_id` to `task_id`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn delete_relation(&mut self, task_id: TaskId, user_id: UserId) -> StoreResult<bool>;

    /// Lists every relation of a task.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn list_task_relations(&mut self, task_id: TaskId) -> StoreResult<Vec<TaskRelation>>;
}

/// Task template persistence.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore {
    /// Stores a new template.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn insert_template(&mut self, template: &TaskTemplate) -> StoreResult<()>;

    /// Finds a template by identifier.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn find_template(&mut self, id: TemplateId) -> StoreResult<Option<TaskTemplate>>;

    /// Lists a group's templates, newest first.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the read fails.
    fn list_templates(&mut self, group_id: GroupId) -> StoreResult<Vec<TaskTemplate>>;

    /// Deletes a template.
    ///
    /// # Errors
    ///
    /// Returns a persistence error when the write fails.
    fn delete_template(&mut self, id: TemplateId) -> StoreResult<bool>;
}
