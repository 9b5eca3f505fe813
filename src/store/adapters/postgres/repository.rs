//! `PostgreSQL` store: one Diesel transaction per unit of work.

use super::{
    models::{GroupRow, MembershipRow, RelationRow, TaskRow, TemplateRow, UserRow},
    schema::{groups, memberships, task_relations, task_templates, tasks, users},
};
use crate::account::domain::{EmailAddress, User, UserId};
use crate::group::domain::{Group, GroupId, Membership};
use crate::store::ports::{
    GroupStore, MembershipStore, RelationStore, Store, StoreError, StoreResult, StoreTransaction,
    TaskStore, TemplateStore, UserStore,
};
use crate::task::domain::{
    Reaction, Task, TaskFilterKind, TaskId, TaskQuery, TaskRelation, TaskTemplate, TemplateId,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the store.
pub type StorePgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed entity store.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: StorePgPool,
}

impl PostgresStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: StorePgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url` and wraps it in a store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the pool cannot be built.
    pub fn connect(database_url: &str) -> StoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .build(manager)
            .map_err(StoreError::persistence)?;
        Ok(Self::new(pool))
    }
}

/// Failure of a transaction body: either the caller's own error or a
/// database error raised while committing or rolling back.
enum TxFailure<E> {
    Work(E),
    Diesel(DieselError),
}

impl<E> From<DieselError> for TxFailure<E> {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut pooled = pool.get().map_err(StoreError::persistence)?;
            let connection: &mut PgConnection = &mut pooled;
            connection
                .transaction::<T, TxFailure<E>, _>(|conn| {
                    work(&mut PgTransaction { conn }).map_err(TxFailure::Work)
                })
                .map_err(|failure| match failure {
                    TxFailure::Work(err) => err,
                    TxFailure::Diesel(err) => E::from(StoreError::persistence(err)),
                })
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

struct PgTransaction<'a> {
    conn: &'a mut PgConnection,
}

fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

fn load_all<R, D>(rows: Vec<R>) -> StoreResult<Vec<D>>
where
    D: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(D::try_from).collect()
}

fn load_pairs(rows: Vec<(TaskRow, GroupRow)>) -> StoreResult<Vec<(Task, Group)>> {
    rows.into_iter()
        .map(|(task, group)| Ok((Task::try_from(task)?, Group::try_from(group)?)))
        .collect()
}

impl UserStore for PgTransaction<'_> {
    fn insert_user(&mut self, user: &User) -> StoreResult<()> {
        diesel::insert_into(users::table)
            .values(UserRow::from(user))
            .execute(self.conn)
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateEmail
                } else {
                    StoreError::persistence(err)
                }
            })?;
        Ok(())
    }

    fn update_user(&mut self, user: &User) -> StoreResult<()> {
        diesel::update(users::table.find(user.id().into_inner()))
            .set(UserRow::from(user))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    fn find_user(&mut self, id: UserId) -> StoreResult<Option<User>> {
        users::table
            .find(id.into_inner())
            .select(UserRow::as_select())
            .first::<UserRow>(self.conn)
            .optional()
            .map_err(StoreError::persistence)?
            .map(User::try_from)
            .transpose()
    }

    fn find_user_by_email(&mut self, email: &EmailAddress) -> StoreResult<Option<User>> {
        users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(self.conn)
            .optional()
            .map_err(StoreError::persistence)?
            .map(User::try_from)
            .transpose()
    }

    fn delete_user(&mut self, id: UserId) -> StoreResult<bool> {
        let deleted = diesel::delete(users::table.find(id.into_inner()))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(deleted > 0)
    }
}

impl GroupStore for PgTransaction<'_> {
    fn insert_group(&mut self, group: &Group) -> StoreResult<()> {
        diesel::insert_into(groups::table)
            .values(GroupRow::from(group))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    fn update_group(&mut self, group: &Group) -> StoreResult<()> {
        diesel::update(groups::table.find(group.id().into_inner()))
            .set(GroupRow::from(group))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    fn find_group(&mut self, id: GroupId) -> StoreResult<Option<Group>> {
        groups::table
            .find(id.into_inner())
            .select(GroupRow::as_select())
            .first::<GroupRow>(self.conn)
            .optional()
            .map_err(StoreError::persistence)?
            .map(Group::try_from)
            .transpose()
    }

    fn lock_group(&mut self, id: GroupId) -> StoreResult<Option<Group>> {
        groups::table
            .find(id.into_inner())
            .select(GroupRow::as_select())
            .for_update()
            .first::<GroupRow>(self.conn)
            .optional()
            .map_err(StoreError::persistence)?
            .map(Group::try_from)
            .transpose()
    }

    fn delete_group(&mut self, id: GroupId) -> StoreResult<bool> {
        // Memberships, tasks, relations and templates go via ON DELETE CASCADE.
        let deleted = diesel::delete(groups::table.find(id.into_inner()))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(deleted > 0)
    }
}

impl MembershipStore for PgTransaction<'_> {
    fn insert_membership(&mut self, membership: &Membership) -> StoreResult<()> {
        diesel::insert_into(memberships::table)
            .values(MembershipRow::from(membership))
            .execute(self.conn)
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateMembership
                } else {
                    StoreError::persistence(err)
                }
            })?;
        Ok(())
    }

    fn update_membership(&mut self, membership: &Membership) -> StoreResult<()> {
        diesel::update(memberships::table.find(membership.id().into_inner()))
            .set(MembershipRow::from(membership))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    fn find_membership(
        &mut self,
        user_id: UserId,
        group_id: GroupId,
    ) -> StoreResult<Option<Membership>> {
        let row = memberships::table
            .filter(memberships::user_id.eq(user_id.into_inner()))
            .filter(memberships::group_id.eq(group_id.into_inner()))
            .select(MembershipRow::as_select())
            .first::<MembershipRow>(self.conn)
            .optional()
            .map_err(StoreError::persistence)?;
        Ok(row.map(Membership::from))
    }

    fn delete_membership(&mut self, user_id: UserId, group_id: GroupId) -> StoreResult<bool> {
        let deleted = diesel::delete(
            memberships::table
                .filter(memberships::user_id.eq(user_id.into_inner()))
                .filter(memberships::group_id.eq(group_id.into_inner())),
        )
        .execute(self.conn)
        .map_err(StoreError::persistence)?;
        Ok(deleted > 0)
    }

    fn count_memberships(&mut self, group_id: GroupId) -> StoreResult<u64> {
        let count: i64 = memberships::table
            .filter(memberships::group_id.eq(group_id.into_inner()))
            .count()
            .get_result(self.conn)
            .map_err(StoreError::persistence)?;
        u64::try_from(count).map_err(StoreError::persistence)
    }

    fn list_group_memberships(&mut self, group_id: GroupId) -> StoreResult<Vec<Membership>> {
        let rows = memberships::table
            .filter(memberships::group_id.eq(group_id.into_inner()))
            .order((memberships::joined_at.asc(), memberships::user_id.asc()))
            .select(MembershipRow::as_select())
            .load::<MembershipRow>(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(rows.into_iter().map(Membership::from).collect())
    }

    fn list_user_memberships(&mut self, user_id: UserId) -> StoreResult<Vec<Membership>> {
        let rows = memberships::table
            .filter(memberships::user_id.eq(user_id.into_inner()))
            .order((memberships::joined_at.asc(), memberships::group_id.asc()))
            .select(MembershipRow::as_select())
            .load::<MembershipRow>(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(rows.into_iter().map(Membership::from).collect())
    }
}

impl TaskStore for PgTransaction<'_> {
    fn insert_task(&mut self, task: &Task) -> StoreResult<()> {
        diesel::insert_into(tasks::table)
            .values(TaskRow::from(task))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    fn update_task(&mut self, task: &Task) -> StoreResult<()> {
        diesel::update(tasks::table.find(task.id().into_inner()))
            .set(TaskRow::from(task))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    fn find_task(&mut self, id: TaskId) -> StoreResult<Option<Task>> {
        tasks::table
            .find(id.into_inner())
            .select(TaskRow::as_select())
            .first::<TaskRow>(self.conn)
            .optional()
            .map_err(StoreError::persistence)?
            .map(Task::try_from)
            .transpose()
    }

    fn delete_task(&mut self, id: TaskId) -> StoreResult<bool> {
        let deleted = diesel::delete(tasks::table.find(id.into_inner()))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(deleted > 0)
    }

    fn query_tasks(
        &mut self,
        group_id: GroupId,
        caller: UserId,
        query: &TaskQuery,
    ) -> StoreResult<Vec<Task>> {
        let mut statement = tasks::table
            .filter(tasks::group_id.eq(group_id.into_inner()))
            .select(TaskRow::as_select())
            .into_boxed();
        if let Some(from) = query.from {
            statement = statement.filter(tasks::date.ge(from));
        }
        if let Some(to) = query.to {
            statement = statement.filter(tasks::date.le(to));
        }

        let caller_relations = task_relations::table
            .filter(task_relations::user_id.eq(caller.into_inner()))
            .select(task_relations::task_id);
        match query.filter {
            Some(TaskFilterKind::MyRelated) => {
                statement = statement.filter(
                    tasks::id.eq_any(
                        caller_relations.filter(
                            task_relations::is_assigned
                                .eq(true)
                                .or(task_relations::reaction.eq(Reaction::Join.as_str())),
                        ),
                    ),
                );
            }
            Some(TaskFilterKind::Undecided) => {
                statement = statement.filter(
                    tasks::id.eq_any(
                        caller_relations
                            .filter(task_relations::reaction.eq(Reaction::Undecided.as_str())),
                    ),
                );
            }
            Some(TaskFilterKind::RecentCreated) | None => {}
        }

        statement = if query.orders_by_creation() {
            statement.order(tasks::created_at.desc())
        } else {
            statement.order((tasks::date.asc(), tasks::created_at.asc()))
        };

        let rows = statement
            .offset(i64::from(query.skip))
            .limit(i64::from(query.limit))
            .load::<TaskRow>(self.conn)
            .map_err(StoreError::persistence)?;
        load_all(rows)
    }

    fn list_tasks_between(
        &mut self,
        group_id: GroupId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<Task>> {
        let rows = tasks::table
            .filter(tasks::group_id.eq(group_id.into_inner()))
            .filter(tasks::date.between(from, to))
            .order((tasks::date.asc(), tasks::created_at.asc()))
            .select(TaskRow::as_select())
            .load::<TaskRow>(self.conn)
            .map_err(StoreError::persistence)?;
        load_all(rows)
    }

    fn list_involved_tasks(
        &mut self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<(Task, Group)>> {
        let accepted_groups = memberships::table
            .filter(memberships::user_id.eq(user_id.into_inner()))
            .filter(memberships::accepted.eq(true))
            .select(memberships::group_id);
        let rows = tasks::table
            .inner_join(groups::table)
            .inner_join(task_relations::table)
            .filter(task_relations::user_id.eq(user_id.into_inner()))
            .filter(
                task_relations::is_assigned
                    .eq(true)
                    .or(task_relations::reaction.eq(Reaction::Join.as_str())),
            )
            .filter(tasks::group_id.eq_any(accepted_groups))
            .filter(tasks::date.between(from, to))
            .order((tasks::date.asc(), tasks::created_at.asc()))
            .select((TaskRow::as_select(), GroupRow::as_select()))
            .load::<(TaskRow, GroupRow)>(self.conn)
            .map_err(StoreError::persistence)?;
        load_pairs(rows)
    }

    fn list_tasks_on(&mut self, date: NaiveDate) -> StoreResult<Vec<(Task, Group)>> {
        let rows = tasks::table
            .inner_join(groups::table)
            .filter(tasks::date.eq(date))
            .order(tasks::created_at.asc())
            .select((TaskRow::as_select(), GroupRow::as_select()))
            .load::<(TaskRow, GroupRow)>(self.conn)
            .map_err(StoreError::persistence)?;
        load_pairs(rows)
    }
}

impl RelationStore for PgTransaction<'_> {
    fn find_relation(
        &mut self,
        task_id: TaskId,
        user_id: UserId,
    ) -> StoreResult<Option<TaskRelation>> {
        task_relations::table
            .filter(task_relations::task_id.eq(task_id.into_inner()))
            .filter(task_relations::user_id.eq(user_id.into_inner()))
            .select(RelationRow::as_select())
            .first::<RelationRow>(self.conn)
            .optional()
            .map_err(StoreError::persistence)?
            .map(TaskRelation::try_from)
            .transpose()
    }

    fn insert_relation(&mut self, relation: &TaskRelation) -> StoreResult<()> {
        let row = RelationRow::from(relation);
        // Nested transaction: a savepoint, so a conflict does not poison the
        // enclosing transaction.
        self.conn
            .transaction::<_, DieselError, _>(|conn| {
                diesel::insert_into(task_relations::table)
                    .values(&row)
                    .execute(conn)
            })
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DuplicateRelation
                } else {
                    StoreError::persistence(err)
                }
            })?;
        Ok(())
    }

    fn update_relation(&mut self, relation: &TaskRelation) -> StoreResult<()> {
        diesel::update(task_relations::table.find(relation.id().into_inner()))
            .set(RelationRow::from(relation))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    fn delete_relation(&mut self, task_id: TaskId, user_id: UserId) -> StoreResult<bool> {
        let deleted = diesel::delete(
            task_relations::table
                .filter(task_relations::task_id.eq(task_id.into_inner()))
                .filter(task_relations::user_id.eq(user_id.into_inner())),
        )
        .execute(self.conn)
        .map_err(StoreError::persistence)?;
        Ok(deleted > 0)
    }

    fn list_task_relations(&mut self, task_id: TaskId) -> StoreResult<Vec<TaskRelation>> {
        let rows = task_relations::table
            .filter(task_relations::task_id.eq(task_id.into_inner()))
            .order(task_relations::user_id.asc())
            .select(RelationRow::as_select())
            .load::<RelationRow>(self.conn)
            .map_err(StoreError::persistence)?;
        load_all(rows)
    }
}

impl TemplateStore for PgTransaction<'_> {
    fn insert_template(&mut self, template: &TaskTemplate) -> StoreResult<()> {
        diesel::insert_into(task_templates::table)
            .values(TemplateRow::from(template))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(())
    }

    fn find_template(&mut self, id: TemplateId) -> StoreResult<Option<TaskTemplate>> {
        task_templates::table
            .find(id.into_inner())
            .select(TemplateRow::as_select())
            .first::<TemplateRow>(self.conn)
            .optional()
            .map_err(StoreError::persistence)?
            .map(TaskTemplate::try_from)
            .transpose()
    }

    fn list_templates(&mut self, group_id: GroupId) -> StoreResult<Vec<TaskTemplate>> {
        let rows = task_templates::table
            .filter(task_templates::group_id.eq(group_id.into_inner()))
            .order(task_templates::created_at.desc())
            .select(TemplateRow::as_select())
            .load::<TemplateRow>(self.conn)
            .map_err(StoreError::persistence)?;
        load_all(rows)
    }

    fn delete_template(&mut self, id: TemplateId) -> StoreResult<bool> {
        let deleted = diesel::delete(task_templates::table.find(id.into_inner()))
            .execute(self.conn)
            .map_err(StoreError::persistence)?;
        Ok(deleted > 0)
    }
}
