//! Transaction handle and the store entry point.

use super::{
    GroupStore, MembershipStore, RelationStore, StoreError, TaskStore, TemplateStore, UserStore,
};
use async_trait::async_trait;

/// Every repository operation available inside one open transaction.
pub trait StoreTransaction:
    UserStore + GroupStore + MembershipStore + TaskStore + RelationStore + TemplateStore
{
}

impl<T> StoreTransaction for T where
    T: UserStore + GroupStore + MembershipStore + TaskStore + RelationStore + TemplateStore
{
}

/// Transactional entity store.
#[async_trait]
pub trait Store: Send + Sync {
    /// Runs `work` as one atomic unit.
    ///
    /// Returning `Ok` commits every write `work` performed; returning `Err`
    /// rolls all of them back. The handle is released on every exit path.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `work`, or a [`StoreError`] converted
    /// into `E` when the transaction cannot be opened or committed.
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static;
}
