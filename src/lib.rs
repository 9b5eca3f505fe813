//! Corkboard: group task and calendar coordination backend.
//!
//! Users form groups, ask to join them, and get approved by group admins.
//! Members share dated tasks and events, react to them, get assigned as
//! responsible parties, and receive Slack reminders.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture:
//!
//! - **Domain**: Pure business rules with no infrastructure dependencies
//! - **Ports**: Trait interfaces for persistence and outside collaborators
//! - **Adapters**: Concrete implementations of ports (`PostgreSQL`, Slack,
//!   credentials)
//! - **Services**: Orchestration running each operation in one transaction
//!
//! # Modules
//!
//! - [`store`]: Transactional entity store shared by every context
//! - [`account`]: Users, signup, login and identifier resolution
//! - [`group`]: Membership lifecycle and the authorization guard
//! - [`task`]: Tasks, the relation reconciler and templates
//! - [`reminder`]: Daily Slack reminders and new-task announcements
//! - [`config`]: Environment-driven settings
//! - [`error`]: Logical failure kinds

pub mod account;
pub mod config;
pub mod error;
pub mod group;
pub mod reminder;
pub mod store;
pub mod task;

#[cfg(test)]
mod test_support;
