//! Sign-in and profile services.
//!
//! Sign-in authenticates through [`LoginService`], loads the account and its
//! roles from the [`IdentityStore`], and mints a token with the
//! [`SessionTokenIssuer`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    IdentityStore, IdentityStoreError, LoginService, SessionCommand, UserProfileQuery,
};
use crate::domain::{Error, LoginCredentials, SessionToken, SessionTokenIssuer, User, UserId};

pub(crate) fn map_identity_error(error: IdentityStoreError) -> Error {
    match error {
        IdentityStoreError::Connection { message } => {
            Error::service_unavailable(format!("identity store unavailable: {message}"))
        }
        IdentityStoreError::Query { message } => {
            Error::internal(format!("identity store error: {message}"))
        }
    }
}

/// Sign-in service implementing [`SessionCommand`].
#[derive(Clone)]
pub struct SessionService<I> {
    login: Arc<dyn LoginService>,
    identities: Arc<I>,
    issuer: SessionTokenIssuer,
}

impl<I> SessionService<I> {
    /// Wire the service from its collaborators.
    pub fn new(login: Arc<dyn LoginService>, identities: Arc<I>, issuer: SessionTokenIssuer) -> Self {
        Self {
            login,
            identities,
            issuer,
        }
    }
}

#[async_trait]
impl<I> SessionCommand for SessionService<I>
where
    I: IdentityStore,
{
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<SessionToken, Error> {
        let user_id = self.login.authenticate(credentials).await?;

        let Some(user) = self
            .identities
            .get_user_by_id(&user_id)
            .await
            .map_err(map_identity_error)?
        else {
            warn!(user_id = %user_id, "authenticated user has no identity record");
            return Err(Error::unauthorized("invalid credentials"));
        };
        let roles = self
            .identities
            .get_roles_for_user(&user_id)
            .await
            .map_err(map_identity_error)?;

        let token = self.issuer.issue(&user.with_roles(roles))?;
        info!(user_id = %user_id, expires_at = %token.expiration(), "session token issued");
        Ok(token)
    }
}

/// Profile query backed by the identity store.
#[derive(Clone)]
pub struct ProfileService<I> {
    identities: Arc<I>,
}

impl<I> ProfileService<I> {
    /// Create a profile service over `identities`.
    pub fn new(identities: Arc<I>) -> Self {
        Self { identities }
    }
}

#[async_trait]
impl<I> UserProfileQuery for ProfileService<I>
where
    I: IdentityStore,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.identities
            .get_user_by_id(user_id)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}
