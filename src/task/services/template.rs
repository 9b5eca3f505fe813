//! Task template management.

use super::error::{TaskError, TaskResult};
use crate::account::domain::UserId;
use crate::group::domain::GroupId;
use crate::group::services::{require_admin, require_member};
use crate::store::ports::{GroupStore, Store, TemplateStore};
use crate::task::domain::{TaskTemplate, TemplateDraft, TemplateId};
use mockable::Clock;
use std::sync::Arc;

/// Group template orchestration service.
#[derive(Clone)]
pub struct TemplateService<S, C>
where
    S: Store,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TemplateService<S, C>
where
    S: Store,
    C: Clock + Send + Sync,
{
    /// Creates a new template service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Stores a template for `group_id`. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Domain`] for a blank name,
    /// [`TaskError::GroupNotFound`] or [`TaskError::Access`].
    pub async fn create_template(
        &self,
        group_id: GroupId,
        draft: TemplateDraft,
        by: UserId,
    ) -> TaskResult<TaskTemplate> {
        let template = TaskTemplate::new(group_id, draft, &*self.clock)?;
        self.store
            .transaction(move |tx| -> TaskResult<TaskTemplate> {
                if tx.find_group(group_id)?.is_none() {
                    return Err(TaskError::GroupNotFound(group_id));
                }
                require_admin(tx, by, group_id)?;
                tx.insert_template(&template)?;
                Ok(template)
            })
            .await
    }

    /// Lists a group's templates, newest first. Members only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::GroupNotFound`] or [`TaskError::Access`].
    pub async fn list_templates(
        &self,
        group_id: GroupId,
        by: UserId,
    ) -> TaskResult<Vec<TaskTemplate>> {
        self.store
            .transaction(move |tx| -> TaskResult<Vec<TaskTemplate>> {
                if tx.find_group(group_id)?.is_none() {
                    return Err(TaskError::GroupNotFound(group_id));
                }
                require_member(tx, by, group_id)?;
                Ok(tx.list_templates(group_id)?)
            })
            .await
    }

    /// Deletes one of the group's templates. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Access`], or [`TaskError::TemplateNotFound`]
    /// when the template is unknown or belongs to another group.
    pub async fn delete_template(
        &self,
        group_id: GroupId,
        template_id: TemplateId,
        by: UserId,
    ) -> TaskResult<()> {
        self.store
            .transaction(move |tx| -> TaskResult<()> {
                require_admin(tx, by, group_id)?;
                let owned = tx
                    .find_template(template_id)?
                    .is_some_and(|template| template.group_id() == group_id);
                if !owned {
                    return Err(TaskError::TemplateNotFound(template_id));
                }
                tx.delete_template(template_id)?;
                Ok(())
            })
            .await
    }
}
