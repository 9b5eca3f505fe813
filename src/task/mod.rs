//! Group tasks, per-user task relations and task templates.
//!
//! The relation reconciler keeps the sparse (task, user) rows honest: a row
//! is created on first touch, tolerates a concurrent first touch, and is
//! deleted as soon as it carries no information. The module follows the
//! hexagonal layout:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod ports;
pub mod services;
