//! Signup, login, token authentication and account administration.

use super::error::{AccountError, AccountResult};
use crate::account::domain::{DisplayName, EmailAddress, User, UserId, UserIdentifier};
use crate::account::ports::{AccessClaims, PasswordHasher, TokenIssuer};
use crate::group::domain::{GroupId, GroupMembershipView};
use crate::group::services::dissolve_if_empty;
use crate::store::ports::{GroupStore, MembershipStore, Store, StoreResult, UserStore};
use chrono::Duration;
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Looks a user up by id or by email.
///
/// # Errors
///
/// Returns a store error when the read fails.
pub fn resolve_user<S>(store: &mut S, identifier: &UserIdentifier) -> StoreResult<Option<User>>
where
    S: UserStore + ?Sized,
{
    match identifier {
        UserIdentifier::Id(id) => store.find_user(*id),
        UserIdentifier::Email(email) => store.find_user_by_email(email),
    }
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct AccessGrant {
    /// Bearer token for subsequent calls.
    pub token: String,
    /// The logged-in user.
    pub user: User,
}

/// Outcome of deleting an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDeletion {
    /// Deleted user.
    pub user_id: UserId,
    /// Groups deleted because the user was their last member.
    pub dissolved_groups: Vec<GroupId>,
}

/// Account orchestration service.
#[derive(Clone)]
pub struct AccountService<S, C>
where
    S: Store,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    token_ttl: Duration,
}

impl<S, C> AccountService<S, C>
where
    S: Store,
    C: Clock + Send + Sync,
{
    /// Creates a new account service issuing tokens valid for `token_ttl`.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        clock: Arc<C>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            hasher,
            tokens,
            token_ttl,
        }
    }

    /// Registers an active, non-superuser account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Domain`] for a malformed name or email,
    /// [`AccountError::EmailTaken`] when the email is registered, and
    /// [`AccountError::Credential`] when hashing fails.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> AccountResult<User> {
        let user = User::new(
            DisplayName::new(name)?,
            EmailAddress::new(email)?,
            self.hasher.hash(password)?,
            &*self.clock,
        );
        let created = self
            .store
            .transaction(move |tx| -> AccountResult<User> {
                if tx.find_user_by_email(user.email())?.is_some() {
                    return Err(AccountError::EmailTaken(user.email().clone()));
                }
                tx.insert_user(&user)?;
                Ok(user)
            })
            .await?;
        info!(user_id = %created.id(), "user signed up");
        Ok(created)
    }

    /// Checks an email and password pair and issues an access token.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Unauthenticated`] for unknown emails or wrong
    /// passwords and [`AccountError::AccountFrozen`] for frozen accounts.
    pub async fn log_in(&self, email: &str, password: &str) -> AccountResult<AccessGrant> {
        let address = EmailAddress::new(email).map_err(|_| AccountError::Unauthenticated)?;
        let user = self
            .store
            .transaction(move |tx| -> AccountResult<Option<User>> {
                Ok(tx.find_user_by_email(&address)?)
            })
            .await?
            .ok_or(AccountError::Unauthenticated)?;
        if !self.hasher.verify(password, user.password_hash())? {
            return Err(AccountError::Unauthenticated);
        }
        if !user.is_active() {
            return Err(AccountError::AccountFrozen(user.id()));
        }
        let claims = AccessClaims::new(user.id().to_string(), self.clock.utc(), self.token_ttl);
        let token = self.tokens.issue(&claims)?;
        Ok(AccessGrant { token, user })
    }

    /// Resolves a bearer token to its active user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Credential`] for a rejected token,
    /// [`AccountError::Unauthenticated`] when the subject no longer exists
    /// and [`AccountError::AccountFrozen`] for frozen accounts.
    pub async fn authenticate(&self, token: &str) -> AccountResult<User> {
        let claims = self.tokens.verify(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map(UserId::from_uuid)
            .map_err(|_| AccountError::Unauthenticated)?;
        let user = self
            .store
            .transaction(move |tx| -> AccountResult<Option<User>> { Ok(tx.find_user(user_id)?) })
            .await?
            .ok_or(AccountError::Unauthenticated)?;
        if !user.is_active() {
            return Err(AccountError::AccountFrozen(user_id));
        }
        Ok(user)
    }

    /// Returns a user's own profile.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UserNotFound`] when the user does not exist.
    pub async fn profile(&self, user_id: UserId) -> AccountResult<User> {
        self.resolve(UserIdentifier::Id(user_id)).await
    }

    /// Resolves an id-or-email identifier to a user.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UserNotFound`] when nothing matches.
    pub async fn resolve(&self, identifier: UserIdentifier) -> AccountResult<User> {
        self.store
            .transaction(move |tx| -> AccountResult<User> {
                resolve_user(tx, &identifier)?.ok_or(AccountError::UserNotFound(identifier))
            })
            .await
    }

    /// Lists every membership of a user, pending ones included.
    ///
    /// # Errors
    ///
    /// Returns a store error when the read fails.
    pub async fn my_groups(&self, user_id: UserId) -> AccountResult<Vec<GroupMembershipView>> {
        self.store
            .transaction(move |tx| -> AccountResult<Vec<GroupMembershipView>> {
                let mut views = Vec::new();
                for membership in tx.list_user_memberships(user_id)? {
                    if let Some(group) = tx.find_group(membership.group_id())? {
                        views.push(GroupMembershipView::new(&membership, group.name().as_str()));
                    }
                }
                Ok(views)
            })
            .await
    }

    /// Freezes or unfreezes another account. Superusers only.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::NotSuperuser`],
    /// [`AccountError::UserNotFound`] or [`AccountError::SelfStatusChange`].
    pub async fn set_active(
        &self,
        target: UserIdentifier,
        active: bool,
        by: UserId,
    ) -> AccountResult<User> {
        let updated = self
            .store
            .transaction(move |tx| -> AccountResult<User> {
                let caller_is_superuser = tx.find_user(by)?.as_ref().is_some_and(User::is_superuser);
                if !caller_is_superuser {
                    return Err(AccountError::NotSuperuser(by));
                }
                let mut user =
                    resolve_user(tx, &target)?.ok_or(AccountError::UserNotFound(target))?;
                if user.id() == by {
                    return Err(AccountError::SelfStatusChange(by));
                }
                user.set_active(active);
                tx.update_user(&user)?;
                Ok(user)
            })
            .await?;
        info!(user_id = %updated.id(), active, by = %by, "account active flag changed");
        Ok(updated)
    }

    /// Deletes a user's own account with its memberships and relations.
    ///
    /// Groups left without members are dissolved in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::UserNotFound`] when the user does not exist.
    pub async fn delete_account(&self, user_id: UserId) -> AccountResult<AccountDeletion> {
        let deletion = self
            .store
            .transaction(move |tx| -> AccountResult<AccountDeletion> {
                let mut group_ids: Vec<GroupId> = tx
                    .list_user_memberships(user_id)?
                    .iter()
                    .map(|membership| membership.group_id())
                    .collect();
                group_ids.sort_unstable();
                for group_id in &group_ids {
                    tx.lock_group(*group_id)?;
                }
                if !tx.delete_user(user_id)? {
                    return Err(AccountError::UserNotFound(UserIdentifier::Id(user_id)));
                }
                let mut dissolved_groups = Vec::new();
                for group_id in group_ids {
                    if dissolve_if_empty(tx, group_id)? {
                        dissolved_groups.push(group_id);
                    }
                }
                Ok(AccountDeletion {
                    user_id,
                    dissolved_groups,
                })
            })
            .await?;
        info!(
            user_id = %user_id,
            dissolved = deletion.dissolved_groups.len(),
            "account deleted"
        );
        Ok(deletion)
    }
}
