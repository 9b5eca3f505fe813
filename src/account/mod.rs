//! User accounts: signup, login, token authentication and administration.
//!
//! - Domain types in [`domain`]
//! - Credential port contracts in [`ports`]
//! - `argon2` and `jsonwebtoken` adapters in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
