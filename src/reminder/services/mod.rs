//! Reminder services: the daily pass, Slack connection and new-task
//! announcements.

mod announcer;
mod integration;
mod reminder;

pub use announcer::SlackTaskAnnouncer;
pub use integration::{
    IntegrationError, IntegrationResult, IntegrationService, SlackConnection,
};
pub use reminder::{ReminderError, ReminderReport, ReminderResult, ReminderService, find_due_tasks};
