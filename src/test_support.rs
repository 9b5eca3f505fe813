//! Fixtures shared by the unit tests of every context.

use crate::account::domain::{DisplayName, EmailAddress, PersistedUserData, User, UserId};
use crate::store::adapters::InMemoryStore;
use crate::store::ports::{Store, StoreError, UserStore};
use mockable::{Clock, DefaultClock};

fn build_user(name: &str, is_superuser: bool) -> User {
    User::from_persisted(PersistedUserData {
        id: UserId::new(),
        display_name: DisplayName::new(name).expect("valid display name"),
        email: EmailAddress::new(format!("{}@example.test", name.to_ascii_lowercase()))
            .expect("valid email"),
        password_hash: "hashed:password".to_owned(),
        is_active: true,
        is_superuser,
        created_at: DefaultClock.utc(),
    })
}

async fn insert(store: &InMemoryStore, user: User) -> User {
    let stored = user.clone();
    store
        .transaction(move |tx| -> Result<(), StoreError> { tx.insert_user(&stored) })
        .await
        .expect("user insert should succeed");
    user
}

/// Stores an active user named `name` with email `<name>@example.test`.
pub async fn seed_user(store: &InMemoryStore, name: &str) -> User {
    insert(store, build_user(name, false)).await
}

/// Stores an active superuser.
pub async fn seed_superuser(store: &InMemoryStore, name: &str) -> User {
    insert(store, build_user(name, true)).await
}
