//! Slack message rendering.

use super::{ReminderOffset, TaskNotice};
use chrono::NaiveDateTime;
use minijinja::{Environment, context};
use thiserror::Error;

const REMINDER_TEMPLATE: &str = "{{ headline }}
📌 *{{ title }}*
📅 日付: {{ date }}
⏰ 時間: {{ time_range }}";

const ANNOUNCEMENT_TEMPLATE: &str = "🆕 *新しい{{ label }}が登録されました*
━━━━━━━━━━━━━━━━━━
📌 *{{ title }}*
📅 日付: {{ date }}
🏢 時間: {{ time_range }}
━━━━━━━━━━━━━━━━━━";

/// Failure to render a message template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to render message: {0}")]
pub struct RenderError(String);

/// Formats an optional time span; `未定` when neither end is known.
#[must_use]
pub fn format_time_range(
    starts_at: Option<NaiveDateTime>,
    ends_at: Option<NaiveDateTime>,
) -> String {
    if starts_at.is_none() && ends_at.is_none() {
        return "未定".to_owned();
    }
    let show = |value: Option<NaiveDateTime>| value.map(|time| time.to_string()).unwrap_or_default();
    format!("{}～{}", show(starts_at), show(ends_at))
}

const fn headline(offset: ReminderOffset, is_task: bool) -> &'static str {
    match (offset, is_task) {
        (ReminderOffset::Today, true) => "🚨 *【本日】タスクの期限です！*",
        (ReminderOffset::Tomorrow, true) => "⚠️ *【明日】タスクの期限です*",
        (ReminderOffset::NextWeek, true) => "📅 *【来週】タスクまであと1週間です*",
        (ReminderOffset::Today, false) => "✨ *【本日】予定があります！*",
        (ReminderOffset::Tomorrow, false) => "🔜 *【明日】予定があります*",
        (ReminderOffset::NextWeek, false) => "📅 *【来週】予定まであと1週間です*",
    }
}

/// Renders the reminder sent `days_left` days before a task.
///
/// Returns `Ok(None)` for day counts without a phrasing.
///
/// # Errors
///
/// Returns [`RenderError`] when the template fails to render.
pub fn render_reminder(notice: &TaskNotice, days_left: i64) -> Result<Option<String>, RenderError> {
    let Some(offset) = ReminderOffset::from_days(days_left) else {
        return Ok(None);
    };
    let text = Environment::new()
        .render_str(
            REMINDER_TEMPLATE,
            context! {
                headline => headline(offset, notice.is_task),
                title => notice.title.as_str(),
                date => notice.date.to_string(),
                time_range => format_time_range(notice.starts_at, notice.ends_at),
            },
        )
        .map_err(|err| RenderError(err.to_string()))?;
    Ok(Some(text))
}

/// Renders the announcement posted when a task is created.
///
/// # Errors
///
/// Returns [`RenderError`] when the template fails to render.
pub fn render_announcement(notice: &TaskNotice) -> Result<String, RenderError> {
    Environment::new()
        .render_str(
            ANNOUNCEMENT_TEMPLATE,
            context! {
                label => if notice.is_task { "タスク" } else { "予定" },
                title => notice.title.as_str(),
                date => notice.date.to_string(),
                time_range => format_time_range(notice.starts_at, notice.ends_at),
            },
        )
        .map_err(|err| RenderError(err.to_string()))
}
