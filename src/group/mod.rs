//! Groups and their membership lifecycle.
//!
//! A user creates a group and becomes its accepted admin; others request to
//! join and wait for an admin's decision. A group whose last membership is
//! removed is deleted with it.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
