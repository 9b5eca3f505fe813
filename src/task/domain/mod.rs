//! Domain model for group tasks, their per-user relations and templates.
//!
//! Relations are sparse: a (task, user) pair without a row reads as
//! unassigned, without reaction and without comment.

mod error;
mod filter;
mod ids;
mod projection;
mod relation;
mod task;
mod template;

pub use error::{ParseReactionError, TaskDomainError};
pub use filter::{DEFAULT_PAGE_LIMIT, MonthRange, TaskFilterKind, TaskQuery, parse_date};
pub use ids::{RelationId, TaskId, TaskTitle, TemplateId};
pub use projection::{CalendarEntry, GlobalCalendarEntry, TaskDetail};
pub use relation::{
    PersistedRelationData, Reaction, RelationOutcome, RelationState, TaskRelation,
};
pub use task::{DEFAULT_STATUS, PersistedTaskData, Task, TaskDetails, TaskPatch};
pub use template::{PersistedTemplateData, TaskTemplate, TemplateDraft};
