//! Slack reminders and announcements.
//!
//! A daily pass looks a fixed set of days ahead, collects the tasks due on
//! each of those days in groups that connected Slack, and posts one message
//! per task. Delivery is best-effort: one failing group never stops the
//! others.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
