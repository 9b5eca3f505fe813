//! Entity store shared by every bounded context.
//!
//! All reads and writes happen inside [`ports::Store::transaction`], which
//! hands a [`ports::StoreTransaction`] to a synchronous unit of work and
//! commits or rolls back as a whole. Uniqueness of emails, memberships per
//! (user, group) and relations per (task, user) is owned here, as are the
//! cascades that follow user, group and task deletion.

pub mod adapters;
pub mod ports;
