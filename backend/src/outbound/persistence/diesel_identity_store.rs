//! PostgreSQL-backed `IdentityStore` adapter.
//!
//! Account rows live in `users`; role memberships in `user_roles`. Upserts
//! replace the role set inside one transaction and never touch
//! `password_hash`, which account provisioning owns.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{IdentityStore, IdentityStoreError, StoredCredentials};
use crate::domain::{RoleName, User, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CredentialRow, NewUserRoleRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_roles, users};

/// Diesel implementation of [`IdentityStore`].
#[derive(Clone)]
pub struct DieselIdentityStore {
    pool: DbPool,
}

impl DieselIdentityStore {
    /// Create a store over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityStoreError {
    map_basic_pool_error(error, IdentityStoreError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityStoreError {
    map_basic_diesel_error(
        error,
        IdentityStoreError::query,
        IdentityStoreError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, IdentityStoreError> {
    User::try_from_strings(&row.id, &row.username, row.email.as_deref())
        .map_err(|err| IdentityStoreError::query(format!("invalid user row {}: {err}", row.id)))
}

fn row_to_credentials(row: CredentialRow) -> Result<StoredCredentials, IdentityStoreError> {
    let user_id = UserId::new(&row.id)
        .map_err(|err| IdentityStoreError::query(format!("invalid user row {}: {err}", row.id)))?;
    Ok(StoredCredentials {
        user_id,
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl IdentityStore for DieselIdentityStore {
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn get_roles_for_user(
        &self,
        id: &UserId,
    ) -> Result<BTreeSet<RoleName>, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let names: Vec<String> = user_roles::table
            .filter(user_roles::user_id.eq(id.as_ref()))
            .select(user_roles::role_name)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        names
            .into_iter()
            .map(|name| {
                RoleName::new(&name)
                    .map_err(|err| IdentityStoreError::query(format!("invalid role {name}: {err}")))
            })
            .collect()
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(CredentialRow::as_select())
            .first::<CredentialRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }

    async fn upsert_user(&self, user: &User) -> Result<(), IdentityStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: user.id().as_ref(),
            username: user.username().as_ref(),
            email: user.email().map(AsRef::as_ref),
        };
        let roles: Vec<NewUserRoleRow<'_>> = user
            .roles()
            .iter()
            .map(|role| NewUserRoleRow {
                user_id: user.id().as_ref(),
                role_name: role.as_ref(),
            })
            .collect();

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&row)
                    .on_conflict(users::id)
                    .do_update()
                    .set((
                        users::username.eq(excluded(users::username)),
                        users::email.eq(excluded(users::email)),
                    ))
                    .execute(conn)
                    .await?;

                diesel::delete(user_roles::table.filter(user_roles::user_id.eq(row.id)))
                    .execute(conn)
                    .await?;

                if !roles.is_empty() {
                    diesel::insert_into(user_roles::table)
                        .values(&roles)
                        .execute(conn)
                        .await?;
                }

                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
