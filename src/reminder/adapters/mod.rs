//! Chat adapters.

pub mod slack;

pub use slack::{SLACK_API_BASE, SlackClient};
