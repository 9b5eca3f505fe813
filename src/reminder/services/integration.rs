//! Connecting a group to a Slack workspace.

use crate::error::ErrorKind;
use crate::group::domain::{GroupDomainError, GroupId, SlackIntegration};
use crate::reminder::ports::{OAuthError, SlackOAuth};
use crate::store::ports::{GroupStore, Store, StoreError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while connecting Slack.
#[derive(Debug, Error)]
pub enum IntegrationError {
    /// The returned credentials are incomplete.
    #[error(transparent)]
    Domain(#[from] GroupDomainError),

    /// The OAuth exchange failed.
    #[error(transparent)]
    OAuth(#[from] OAuthError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The group does not exist.
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),
}

impl IntegrationError {
    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::OAuth(_) => ErrorKind::Validation,
            Self::Store(err) => err.kind(),
            Self::GroupNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for integration operations.
pub type IntegrationResult<T> = Result<T, IntegrationError>;

/// A completed Slack connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackConnection {
    /// Connected group.
    pub group_id: GroupId,
    /// Its name.
    pub group_name: String,
    /// Channel name reported by Slack, if any.
    pub channel_name: Option<String>,
}

/// Slack OAuth orchestration service.
#[derive(Clone)]
pub struct IntegrationService<S>
where
    S: Store,
{
    store: Arc<S>,
    oauth: Arc<dyn SlackOAuth>,
    redirect_uri: String,
}

impl<S> IntegrationService<S>
where
    S: Store,
{
    /// Creates a new integration service completing OAuth against
    /// `redirect_uri`.
    #[must_use]
    pub fn new(store: Arc<S>, oauth: Arc<dyn SlackOAuth>, redirect_uri: impl Into<String>) -> Self {
        Self {
            store,
            oauth,
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Exchanges the OAuth `code` and stores the resulting bot token and
    /// channel on the group.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::GroupNotFound`],
    /// [`IntegrationError::OAuth`] when the exchange fails, or
    /// [`IntegrationError::Domain`] when Slack returns no channel.
    pub async fn connect_slack(
        &self,
        group_id: GroupId,
        code: &str,
    ) -> IntegrationResult<SlackConnection> {
        self.store
            .transaction(move |tx| -> IntegrationResult<()> {
                if tx.find_group(group_id)?.is_none() {
                    return Err(IntegrationError::GroupNotFound(group_id));
                }
                Ok(())
            })
            .await?;

        let grant = self.oauth.exchange_code(code, &self.redirect_uri).await?;
        let slack = SlackIntegration::new(
            grant.access_token,
            grant.channel_id.unwrap_or_default(),
        )?;
        let channel_name = grant.channel_name;

        let group_name = self
            .store
            .transaction(move |tx| -> IntegrationResult<String> {
                let mut group = tx
                    .find_group(group_id)?
                    .ok_or(IntegrationError::GroupNotFound(group_id))?;
                group.connect_slack(slack);
                tx.update_group(&group)?;
                Ok(group.name().as_str().to_owned())
            })
            .await?;
        info!(group_id = %group_id, "Slack connected");
        Ok(SlackConnection {
            group_id,
            group_name,
            channel_name,
        })
    }
}
