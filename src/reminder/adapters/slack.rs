//! Slack Web API client.

use crate::reminder::ports::{ChatNotifier, DeliveryError, OAuthError, SlackGrant, SlackOAuth};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Production Slack Web API root.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IncomingWebhook {
    channel_id: Option<String>,
    channel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OAuthAccessResponse {
    ok: bool,
    error: Option<String>,
    access_token: Option<String>,
    incoming_webhook: Option<IncomingWebhook>,
}

/// [`ChatNotifier`] and [`SlackOAuth`] backed by the Slack Web API.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    client_id: String,
    client_secret: String,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    /// Creates a client for the production Slack API using the app's OAuth
    /// client credentials. Every request is bounded by a 15 second timeout.
    ///
    /// # Errors
    ///
    /// Returns the [`reqwest::Error`] raised when the HTTP client cannot be
    /// built, e.g. when no TLS backend initialises.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_base: SLACK_API_BASE.to_owned(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    /// Points the client at another API root.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }
}

#[async_trait]
impl ChatNotifier for SlackClient {
    async fn send_message(
        &self,
        token: &str,
        channel_id: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        let response: PostMessageResponse = self
            .http
            .post(self.endpoint("chat.postMessage"))
            .bearer_auth(token)
            .json(&json!({ "channel": channel_id, "text": text }))
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?
            .json()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        if response.ok {
            Ok(())
        } else {
            Err(DeliveryError::Rejected(
                response.error.unwrap_or_else(|| "unknown_error".to_owned()),
            ))
        }
    }
}

#[async_trait]
impl SlackOAuth for SlackClient {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<SlackGrant, OAuthError> {
        let response: OAuthAccessResponse = self
            .http
            .post(self.endpoint("oauth.v2.access"))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|err| OAuthError::Transport(err.to_string()))?
            .json()
            .await
            .map_err(|err| OAuthError::Transport(err.to_string()))?;
        if !response.ok {
            return Err(OAuthError::Rejected(
                response.error.unwrap_or_else(|| "unknown_error".to_owned()),
            ));
        }
        let access_token = response
            .access_token
            .ok_or_else(|| OAuthError::Rejected("missing access_token".to_owned()))?;
        let webhook = response.incoming_webhook;
        Ok(SlackGrant {
            access_token,
            channel_id: webhook.as_ref().and_then(|hook| hook.channel_id.clone()),
            channel_name: webhook.and_then(|hook| hook.channel),
        })
    }
}
