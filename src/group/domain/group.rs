//! Group aggregate and its Slack integration.

use super::{GroupDomainError, GroupId, GroupName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack credentials a group uses for notifications.
///
/// Only constructed when both parts are present; a group without a token or
/// without a channel simply has no integration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackIntegration {
    bot_token: String,
    channel_id: String,
}

impl SlackIntegration {
    /// Creates an integration from a bot token and a channel id.
    ///
    /// # Errors
    ///
    /// Returns [`GroupDomainError::IncompleteSlackIntegration`] if either
    /// part is blank.
    pub fn new(
        bot_token: impl Into<String>,
        channel_id: impl Into<String>,
    ) -> Result<Self, GroupDomainError> {
        let token = bot_token.into();
        let channel = channel_id.into();
        if token.trim().is_empty() || channel.trim().is_empty() {
            return Err(GroupDomainError::IncompleteSlackIntegration);
        }
        Ok(Self {
            bot_token: token.trim().to_owned(),
            channel_id: channel.trim().to_owned(),
        })
    }

    /// Builds an integration from nullable persisted columns.
    ///
    /// Returns `None` unless both columns hold non-blank values.
    #[must_use]
    pub fn from_columns(bot_token: Option<String>, channel_id: Option<String>) -> Option<Self> {
        match (bot_token, channel_id) {
            (Some(token), Some(channel)) => Self::new(token, channel).ok(),
            _ => None,
        }
    }

    /// Returns the bot token.
    #[must_use]
    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    /// Returns the channel identifier.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }
}

impl fmt::Debug for SlackIntegration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackIntegration")
            .field("bot_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

/// Named collaboration space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    name: GroupName,
    #[serde(skip_serializing)]
    slack: Option<SlackIntegration>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedGroupData {
    /// Persisted group identifier.
    pub id: GroupId,
    /// Persisted group name.
    pub name: GroupName,
    /// Persisted Slack credentials, if complete.
    pub slack: Option<SlackIntegration>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new group without any integration.
    #[must_use]
    pub fn new(name: GroupName, clock: &impl Clock) -> Self {
        Self {
            id: GroupId::new(),
            name,
            slack: None,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a group from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedGroupData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            slack: data.slack,
            created_at: data.created_at,
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the group name.
    #[must_use]
    pub const fn name(&self) -> &GroupName {
        &self.name
    }

    /// Returns the Slack integration, if configured.
    #[must_use]
    pub const fn slack(&self) -> Option<&SlackIntegration> {
        self.slack.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Renames the group.
    pub fn rename(&mut self, name: GroupName) {
        self.name = name;
    }

    /// Replaces the Slack integration.
    pub fn connect_slack(&mut self, slack: SlackIntegration) {
        self.slack = Some(slack);
    }
}
