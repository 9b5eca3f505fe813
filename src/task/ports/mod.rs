//! Port contracts for the task context.

pub mod announcer;

pub use announcer::TaskAnnouncer;

#[cfg(test)]
pub use announcer::MockTaskAnnouncer;
