//! In-memory `IdentityStore`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{IdentityStore, IdentityStoreError, StoredCredentials};
use crate::domain::{RoleName, User, UserId, Username};

use super::lock;

/// Users keyed by id, roles stored alongside.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    users: Mutex<HashMap<UserId, User>>,
    password_hashes: Mutex<HashMap<UserId, String>>,
}

impl InMemoryIdentityStore {
    /// Insert or replace `user` without going through the async port.
    pub fn insert(&self, user: User) {
        lock(&self.users).insert(user.id().clone(), user);
    }

    /// Attach an Argon2 PHC string to `id` so the account can log in.
    pub fn set_password_hash(&self, id: &UserId, phc: impl Into<String>) {
        lock(&self.password_hashes).insert(id.clone(), phc.into());
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityStoreError> {
        Ok(lock(&self.users).get(id).map(|user| {
            User::new(
                user.id().clone(),
                user.username().clone(),
                user.email().cloned(),
            )
        }))
    }

    async fn get_roles_for_user(
        &self,
        id: &UserId,
    ) -> Result<BTreeSet<RoleName>, IdentityStoreError> {
        Ok(lock(&self.users)
            .get(id)
            .map(|user| user.roles().clone())
            .unwrap_or_default())
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, IdentityStoreError> {
        let user_id = lock(&self.users)
            .values()
            .find(|user| user.username() == username)
            .map(|user| user.id().clone());
        Ok(user_id.map(|user_id| StoredCredentials {
            password_hash: lock(&self.password_hashes).get(&user_id).cloned(),
            user_id,
        }))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), IdentityStoreError> {
        self.insert(user.clone());
        Ok(())
    }
}
