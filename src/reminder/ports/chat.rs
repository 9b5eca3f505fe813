//! Chat delivery and workspace authorization contracts.

use async_trait::async_trait;
use thiserror::Error;

/// Failure to deliver a chat message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The request never got a usable response.
    #[error("chat transport failed: {0}")]
    Transport(String),

    /// The chat API answered with an error code.
    #[error("chat API rejected the message: {0}")]
    Rejected(String),
}

/// Failure to exchange an OAuth code for workspace credentials.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OAuthError {
    /// The request never got a usable response.
    #[error("OAuth transport failed: {0}")]
    Transport(String),

    /// The authorization server refused the code.
    #[error("OAuth exchange rejected: {0}")]
    Rejected(String),
}

/// Credentials returned by a successful OAuth exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct SlackGrant {
    /// Bot access token.
    pub access_token: String,
    /// Channel chosen during installation, if any.
    pub channel_id: Option<String>,
    /// Human-readable channel name, if any.
    pub channel_name: Option<String>,
}

impl std::fmt::Debug for SlackGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackGrant")
            .field("access_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("channel_name", &self.channel_name)
            .finish()
    }
}

/// Posts plain-text messages to a chat channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    /// Sends `text` to `channel_id` using the workspace `token`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError`] when the message was not accepted.
    async fn send_message(
        &self,
        token: &str,
        channel_id: &str,
        text: &str,
    ) -> Result<(), DeliveryError>;
}

/// Completes the chat workspace OAuth installation flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlackOAuth: Send + Sync {
    /// Exchanges an authorization `code` for workspace credentials.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError`] when the exchange fails.
    async fn exchange_code(&self, code: &str, redirect_uri: &str)
    -> Result<SlackGrant, OAuthError>;
}
