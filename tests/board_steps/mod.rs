//! Step definitions shared by the board scenarios.

mod given;
mod then;
mod when;
pub mod world;
