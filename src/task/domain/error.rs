//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing task domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The title is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The title exceeds the persisted column width.
    #[error("title exceeds {max} characters")]
    TitleTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// A short text field exceeds the persisted column width.
    #[error("{field} exceeds {max} characters")]
    FieldTooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The template name is empty after trimming.
    #[error("template name must not be empty")]
    EmptyTemplateName,

    /// The end of the time span precedes its start.
    #[error("time span ends before it begins")]
    InvalidTimeSpan,

    /// A date string is not `YYYY-MM-DD`.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The requested month is outside `1..=12` or the year is unrepresentable.
    #[error("invalid calendar month {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// The filter type is unknown.
    #[error("unknown task filter: {0}")]
    UnknownFilter(String),
}

/// Error returned while parsing a reaction value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown reaction: {0}")]
pub struct ParseReactionError(pub String);

impl TaskDomainError {
    /// Returns the logical failure kind.
    #[must_use]
    pub const fn kind(&self) -> crate::error::ErrorKind {
        crate::error::ErrorKind::Validation
    }
}
