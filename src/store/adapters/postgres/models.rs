//! Diesel row models and their mapping to domain types.

use super::schema::{groups, memberships, task_relations, task_templates, tasks, users};
use crate::account::domain::{DisplayName, EmailAddress, PersistedUserData, User, UserId};
use crate::group::domain::{
    Group, GroupId, GroupName, Membership, MembershipId, PersistedGroupData,
    PersistedMembershipData, SlackIntegration,
};
use crate::store::ports::{StoreError, StoreResult};
use crate::task::domain::{
    PersistedRelationData, PersistedTaskData, PersistedTemplateData, Reaction, RelationId, Task,
    TaskDetails, TaskId, TaskRelation, TaskTemplate, TaskTitle, TemplateId,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;

/// Row of the `users` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub display_name: String,
    /// Login email.
    pub email: String,
    /// Password hash.
    pub password_hash: String,
    /// Active flag.
    pub is_active: bool,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Signup timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().into_inner(),
            display_name: user.display_name().as_str().to_owned(),
            email: user.email().as_str().to_owned(),
            password_hash: user.password_hash().to_owned(),
            is_active: user.is_active(),
            is_superuser: user.is_superuser(),
            created_at: user.created_at(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedUserData {
            id: UserId::from_uuid(row.id),
            display_name: DisplayName::new(row.display_name).map_err(StoreError::persistence)?,
            email: EmailAddress::new(row.email).map_err(StoreError::persistence)?,
            password_hash: row.password_hash,
            is_active: row.is_active,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
        }))
    }
}

/// Row of the `groups` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct GroupRow {
    /// Group identifier.
    pub id: uuid::Uuid,
    /// Group name.
    pub name: String,
    /// Optional Slack bot token.
    pub slack_bot_token: Option<String>,
    /// Optional Slack channel identifier.
    pub slack_channel_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Group> for GroupRow {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id().into_inner(),
            name: group.name().as_str().to_owned(),
            slack_bot_token: group.slack().map(|slack| slack.bot_token().to_owned()),
            slack_channel_id: group.slack().map(|slack| slack.channel_id().to_owned()),
            created_at: group.created_at(),
        }
    }
}

impl TryFrom<GroupRow> for Group {
    type Error = StoreError;

    fn try_from(row: GroupRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedGroupData {
            id: GroupId::from_uuid(row.id),
            name: GroupName::new(row.name).map_err(StoreError::persistence)?,
            slack: SlackIntegration::from_columns(row.slack_bot_token, row.slack_channel_id),
            created_at: row.created_at,
        }))
    }
}

/// Row of the `memberships` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = memberships)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MembershipRow {
    /// Membership identifier.
    pub id: uuid::Uuid,
    /// Member.
    pub user_id: uuid::Uuid,
    /// Group.
    pub group_id: uuid::Uuid,
    /// Admin flag.
    pub is_admin: bool,
    /// Acceptance flag.
    pub accepted: bool,
    /// Request or creation timestamp.
    pub joined_at: DateTime<Utc>,
}

impl From<&Membership> for MembershipRow {
    fn from(membership: &Membership) -> Self {
        Self {
            id: membership.id().into_inner(),
            user_id: membership.user_id().into_inner(),
            group_id: membership.group_id().into_inner(),
            is_admin: membership.is_admin(),
            accepted: membership.accepted(),
            joined_at: membership.joined_at(),
        }
    }
}

impl From<MembershipRow> for Membership {
    fn from(row: MembershipRow) -> Self {
        Self::from_persisted(PersistedMembershipData {
            id: MembershipId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            group_id: GroupId::from_uuid(row.group_id),
            is_admin: row.is_admin,
            accepted: row.accepted,
            joined_at: row.joined_at,
        })
    }
}

/// Row of the `tasks` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning group.
    pub group_id: uuid::Uuid,
    /// Title.
    pub title: String,
    /// Calendar day.
    pub date: NaiveDate,
    /// Optional start.
    pub starts_at: Option<NaiveDateTime>,
    /// Optional end.
    pub ends_at: Option<NaiveDateTime>,
    /// Optional place.
    pub location: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Deadline-bearing flag.
    pub is_task: bool,
    /// Workflow label.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        let details = task.details();
        Self {
            id: task.id().into_inner(),
            group_id: task.group_id().into_inner(),
            title: details.title.as_str().to_owned(),
            date: details.date,
            starts_at: details.starts_at,
            ends_at: details.ends_at,
            location: details.location.clone(),
            description: details.description.clone(),
            is_task: details.is_task,
            status: details.status.clone(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedTaskData {
            id: TaskId::from_uuid(row.id),
            group_id: GroupId::from_uuid(row.group_id),
            details: TaskDetails {
                title: TaskTitle::new(row.title).map_err(StoreError::persistence)?,
                date: row.date,
                starts_at: row.starts_at,
                ends_at: row.ends_at,
                location: row.location,
                description: row.description,
                is_task: row.is_task,
                status: row.status,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }
}

/// Row of the `task_relations` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = task_relations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct RelationRow {
    /// Relation identifier.
    pub id: uuid::Uuid,
    /// Task side.
    pub task_id: uuid::Uuid,
    /// User side.
    pub user_id: uuid::Uuid,
    /// Responsibility flag.
    pub is_assigned: bool,
    /// Reaction wire value.
    pub reaction: String,
    /// Optional comment.
    pub comment: Option<String>,
}

impl From<&TaskRelation> for RelationRow {
    fn from(relation: &TaskRelation) -> Self {
        Self {
            id: relation.id().into_inner(),
            task_id: relation.task_id().into_inner(),
            user_id: relation.user_id().into_inner(),
            is_assigned: relation.is_assigned(),
            reaction: relation.reaction().as_str().to_owned(),
            comment: relation.comment().map(str::to_owned),
        }
    }
}

impl TryFrom<RelationRow> for TaskRelation {
    type Error = StoreError;

    fn try_from(row: RelationRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedRelationData {
            id: RelationId::from_uuid(row.id),
            task_id: TaskId::from_uuid(row.task_id),
            user_id: UserId::from_uuid(row.user_id),
            is_assigned: row.is_assigned,
            reaction: Reaction::try_from(row.reaction.as_str())
                .map_err(StoreError::persistence)?,
            comment: row.comment,
        }))
    }
}

/// Row of the `task_templates` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_templates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TemplateRow {
    /// Template identifier.
    pub id: uuid::Uuid,
    /// Owning group.
    pub group_id: uuid::Uuid,
    /// Management label.
    pub name: String,
    /// Default title.
    pub title: String,
    /// Default location.
    pub location: Option<String>,
    /// Default description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&TaskTemplate> for TemplateRow {
    fn from(template: &TaskTemplate) -> Self {
        Self {
            id: template.id().into_inner(),
            group_id: template.group_id().into_inner(),
            name: template.name().to_owned(),
            title: template.title().as_str().to_owned(),
            location: template.location().map(str::to_owned),
            description: template.description().map(str::to_owned),
            created_at: template.created_at(),
        }
    }
}

impl TryFrom<TemplateRow> for TaskTemplate {
    type Error = StoreError;

    fn try_from(row: TemplateRow) -> StoreResult<Self> {
        Ok(Self::from_persisted(PersistedTemplateData {
            id: TemplateId::from_uuid(row.id),
            group_id: GroupId::from_uuid(row.group_id),
            name: row.name,
            title: TaskTitle::new(row.title).map_err(StoreError::persistence)?,
            location: row.location,
            description: row.description,
            created_at: row.created_at,
        }))
    }
}
