//! Port contracts for transactional entity persistence.

mod entities;
mod error;
mod transaction;

pub use entities::{GroupStore, MembershipStore, RelationStore, TaskStore, TemplateStore, UserStore};
pub use error::{StoreError, StoreResult};
pub use transaction::{Store, StoreTransaction};

#[cfg(test)]
pub use entities::{
    MockGroupStore, MockMembershipStore, MockRelationStore, MockTaskStore, MockTemplateStore,
    MockUserStore,
};
