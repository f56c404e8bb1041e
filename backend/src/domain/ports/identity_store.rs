//! Driven port for user identities and role memberships.
use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::{RoleName, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity store adapters.
    pub enum IdentityStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "identity store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "identity store query failed: {message}",
    }
}

/// Login material for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the username belongs to.
    pub user_id: UserId,
    /// Argon2 PHC string; `None` when the account cannot log in by password.
    pub password_hash: Option<String>,
}

/// Read access to user records, keyed by [`UserId`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch the account record for `id`.
    ///
    /// The returned user carries no roles; use
    /// [`IdentityStore::get_roles_for_user`] for memberships.
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityStoreError>;

    /// Role names held by `id`; empty when the user has none or is unknown.
    async fn get_roles_for_user(&self, id: &UserId)
    -> Result<BTreeSet<RoleName>, IdentityStoreError>;

    /// Login material for the account named `username`.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, IdentityStoreError>;

    /// Insert or update a user record together with its roles.
    async fn upsert_user(&self, user: &User) -> Result<(), IdentityStoreError>;
}
