//! Environment-driven settings.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/corkboard
//! CORKBOARD_JWT_SECRET=change-me
//! CORKBOARD_TOKEN_TTL_MINUTES=60      # optional
//! SLACK_CLIENT_ID=...
//! SLACK_CLIENT_SECRET=...
//! SLACK_REDIRECT_URI=https://example.test/chat/slack/callback
//! CORKBOARD_REMINDER_HOUR=9           # optional, local time
//! ```

use chrono::Duration;
use std::env;
use thiserror::Error;

const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
const DEFAULT_REMINDER_HOUR: u32 = 9;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable holds an unusable value.
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Slack OAuth application credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SlackSettings {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Redirect URI registered with the Slack app.
    pub redirect_uri: String,
}

impl std::fmt::Debug for SlackSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackSettings")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .finish_non_exhaustive()
    }
}

/// Process settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// `PostgreSQL` connection string.
    pub database_url: String,
    /// Shared secret for access tokens.
    pub jwt_secret: String,
    /// Access-token lifetime.
    pub token_ttl: Duration,
    /// Slack application credentials.
    pub slack: SlackSettings,
    /// Local hour of day the reminder pass runs at.
    pub reminder_hour: u32,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("token_ttl", &self.token_ttl)
            .field("slack", &self.slack)
            .field("reminder_hour", &self.reminder_hour)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing or malformed variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads settings through `lookup`, which returns a variable's value if
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for missing or malformed variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let token_ttl_minutes = match optional("CORKBOARD_TOKEN_TTL_MINUTES") {
            Some(raw) => parse_positive(&raw, "CORKBOARD_TOKEN_TTL_MINUTES")?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };
        let reminder_hour = match optional("CORKBOARD_REMINDER_HOUR") {
            Some(raw) => parse_hour(&raw)?,
            None => DEFAULT_REMINDER_HOUR,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("CORKBOARD_JWT_SECRET")?,
            token_ttl: Duration::minutes(token_ttl_minutes),
            slack: SlackSettings {
                client_id: required("SLACK_CLIENT_ID")?,
                client_secret: required("SLACK_CLIENT_SECRET")?,
                redirect_uri: required("SLACK_REDIRECT_URI")?,
            },
            reminder_hour,
        })
    }
}

fn parse_positive(raw: &str, name: &'static str) -> Result<i64, ConfigError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|minutes| *minutes > 0)
        .ok_or_else(|| ConfigError::Invalid {
            name,
            value: raw.to_owned(),
        })
}

fn parse_hour(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|hour| *hour < 24)
        .ok_or_else(|| ConfigError::Invalid {
            name: "CORKBOARD_REMINDER_HOUR",
            value: raw.to_owned(),
        })
}
