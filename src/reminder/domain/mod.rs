//! Domain model for Slack reminders and announcements.

mod message;
mod notice;
mod offset;

pub use message::{RenderError, format_time_range, render_announcement, render_reminder};
pub use notice::{NotificationRequest, TaskNotice};
pub use offset::{DEFAULT_OFFSETS, ReminderOffset};
