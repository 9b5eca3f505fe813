//! Task services: the relation reconciler, task scheduling and templates.

mod error;
mod reconciler;
mod schedule;
mod template;

pub use error::{TaskError, TaskResult};
pub use reconciler::{ReactionUpdate, RelationService, cleanup_if_empty, ensure_relation};
pub use schedule::TaskService;
pub use template::TemplateService;
