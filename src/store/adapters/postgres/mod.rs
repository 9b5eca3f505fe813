//! `PostgreSQL` adapter for the entity store.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresStore, StorePgPool};
