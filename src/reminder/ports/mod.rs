//! Outbound collaborators of the reminder context.

pub mod chat;

pub use chat::{ChatNotifier, DeliveryError, OAuthError, SlackGrant, SlackOAuth};

#[cfg(test)]
pub use chat::{MockChatNotifier, MockSlackOAuth};
