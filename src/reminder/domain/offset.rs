//! Lookahead windows a reminder can be sent for.

use serde::{Deserialize, Serialize};

/// Day counts [`crate::reminder::services::ReminderService`] looks ahead by.
pub const DEFAULT_OFFSETS: [i64; 3] = [0, 1, 7];

/// A lookahead the message formatter knows how to phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderOffset {
    /// The task is dated today.
    Today,
    /// The task is dated tomorrow.
    Tomorrow,
    /// The task is one week away.
    NextWeek,
}

impl ReminderOffset {
    /// Returns the offset in days.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Today => 0,
            Self::Tomorrow => 1,
            Self::NextWeek => 7,
        }
    }

    /// Maps a raw day count onto a known offset; any other count has no
    /// phrasing and yields `None`.
    #[must_use]
    pub const fn from_days(days: i64) -> Option<Self> {
        match days {
            0 => Some(Self::Today),
            1 => Some(Self::Tomorrow),
            7 => Some(Self::NextWeek),
            _ => None,
        }
    }
}
