//! Task listing filters, ordering and calendar-month windows.

use super::{Reaction, Task, TaskDomainError, TaskId, TaskRelation};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Page size applied when the caller does not supply one.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Caller-relative narrowing of a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilterKind {
    /// Tasks the caller is assigned to or joins.
    MyRelated,
    /// Tasks the caller marked as undecided.
    Undecided,
    /// All tasks, newest first.
    RecentCreated,
}

impl TaskFilterKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MyRelated => "my_related",
            Self::Undecided => "undecided",
            Self::RecentCreated => "recent_created",
        }
    }

    /// Returns `true` when a relation satisfies this filter.
    #[must_use]
    pub fn admits(self, relation: Option<&TaskRelation>) -> bool {
        match self {
            Self::MyRelated => relation.is_some_and(TaskRelation::is_involved),
            Self::Undecided => relation.is_some_and(|rel| rel.reaction() == Reaction::Undecided),
            Self::RecentCreated => true,
        }
    }
}

impl TryFrom<&str> for TaskFilterKind {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "my_related" => Ok(Self::MyRelated),
            "undecided" => Ok(Self::Undecided),
            "recent_created" => Ok(Self::RecentCreated),
            other => Err(TaskDomainError::UnknownFilter(other.to_owned())),
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDate`] for any other shape.
pub fn parse_date(raw: &str) -> Result<NaiveDate, TaskDomainError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| TaskDomainError::InvalidDate(raw.to_owned()))
}

/// Listing criteria for a group's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
    /// Caller-relative filter.
    pub filter: Option<TaskFilterKind>,
    /// Rows skipped after filtering and ordering.
    pub skip: u32,
    /// Maximum rows returned.
    pub limit: u32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQuery {
    /// Creates an unfiltered query with default pagination.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            from: None,
            to: None,
            filter: None,
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Builds a query from raw request parameters.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDate`] for malformed dates and
    /// [`TaskDomainError::UnknownFilter`] for unknown filter names.
    pub fn parse(
        from: Option<&str>,
        to: Option<&str>,
        filter: Option<&str>,
    ) -> Result<Self, TaskDomainError> {
        fn non_blank(value: Option<&str>) -> Option<&str> {
            value.filter(|text| !text.trim().is_empty())
        }

        Ok(Self {
            from: non_blank(from).map(parse_date).transpose()?,
            to: non_blank(to).map(parse_date).transpose()?,
            filter: non_blank(filter).map(TaskFilterKind::try_from).transpose()?,
            ..Self::new()
        })
    }

    /// Restricts the date range.
    #[must_use]
    pub const fn with_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Sets the caller-relative filter.
    #[must_use]
    pub const fn with_filter(mut self, filter: TaskFilterKind) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the pagination window.
    #[must_use]
    pub const fn with_page(mut self, skip: u32, limit: u32) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    /// Returns `true` when results are ordered newest-created first rather
    /// than by date.
    #[must_use]
    pub const fn orders_by_creation(&self) -> bool {
        matches!(self.filter, Some(TaskFilterKind::RecentCreated))
    }

    /// Returns `true` when `date` lies inside the requested range.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Filters, orders and paginates `tasks` in memory.
    ///
    /// `relation_of` yields the caller's relation to a task, if any.
    #[must_use]
    pub fn apply<'a, F>(&self, tasks: impl IntoIterator<Item = Task>, relation_of: F) -> Vec<Task>
    where
        F: Fn(TaskId) -> Option<&'a TaskRelation>,
    {
        let mut selected: Vec<Task> = tasks
            .into_iter()
            .filter(|task| self.covers(task.date()))
            .filter(|task| {
                self.filter
                    .is_none_or(|filter| filter.admits(relation_of(task.id())))
            })
            .collect();
        if self.orders_by_creation() {
            selected.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        } else {
            selected.sort_by(|a, b| {
                a.date()
                    .cmp(&b.date())
                    .then_with(|| a.created_at().cmp(&b.created_at()))
            });
        }
        selected
            .into_iter()
            .skip(usize::try_from(self.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(self.limit).unwrap_or(usize::MAX))
            .collect()
    }
}

/// Inclusive first and last day of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    first: NaiveDate,
    last: NaiveDate,
}

impl MonthRange {
    /// Creates the window for `year`-`month`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidMonth`] when the month is outside
    /// `1..=12` or the year cannot be represented.
    pub fn new(year: i32, month: u32) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidMonth { year, month };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year.checked_add(1).ok_or_else(invalid)?, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        let last = next_first.pred_opt().ok_or_else(invalid)?;
        Ok(Self { first, last })
    }

    /// Returns the first day of the month.
    #[must_use]
    pub const fn first(&self) -> NaiveDate {
        self.first
    }

    /// Returns the last day of the month.
    #[must_use]
    pub const fn last(&self) -> NaiveDate {
        self.last
    }

    /// Returns `true` when `date` falls in the month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.first.year() && date.month() == self.first.month()
    }
}
