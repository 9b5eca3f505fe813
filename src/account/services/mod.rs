//! Account services and identifier resolution.

mod account;
mod error;

pub use account::{AccessGrant, AccountDeletion, AccountService, resolve_user};
pub use error::{AccountError, AccountResult};
