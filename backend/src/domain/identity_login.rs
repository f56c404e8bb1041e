//! `LoginService` that resolves accounts through the [`IdentityStore`].
//!
//! An account with a stored Argon2 hash logs in with its own password. The
//! development account (`admin` / `password`) keeps working when no hash is
//! stored for it and is provisioned with the `Admin` role on first login.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::password::verify_password_blocking;
use super::ports::{
    FIXTURE_USER_ID, FIXTURE_USERNAME, FixtureLoginService, IdentityStore, LoginService,
    StoredCredentials,
};
use super::session_service::map_identity_error;
use super::{Error, LoginCredentials, RoleName, User, UserId, Username};

/// Role granted to the provisioned development account.
pub const FIXTURE_ROLE: &str = "Admin";

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

/// Password login over any [`IdentityStore`].
#[derive(Clone)]
pub struct IdentityLoginService<I> {
    identities: Arc<I>,
}

impl<I> IdentityLoginService<I> {
    /// Create a login service over `identities`.
    pub fn new(identities: Arc<I>) -> Self {
        Self { identities }
    }
}

impl<I> IdentityLoginService<I>
where
    I: IdentityStore,
{
    async fn ensure_fixture_user_exists(&self, user_id: &UserId) -> Result<(), Error> {
        let existing = self
            .identities
            .get_user_by_id(user_id)
            .await
            .map_err(map_identity_error)?;
        if existing.is_some() {
            return Ok(());
        }

        let role = RoleName::new(FIXTURE_ROLE)
            .map_err(|err| Error::internal(format!("invalid fixture role: {err}")))?;
        let user = User::try_from_strings(user_id.as_ref(), FIXTURE_USERNAME, None)
            .map_err(|err| Error::internal(format!("invalid fixture user: {err}")))?
            .with_roles([role].into_iter().collect());

        self.identities
            .upsert_user(&user)
            .await
            .map_err(map_identity_error)?;
        info!(user_id = %user_id, "provisioned development account");
        Ok(())
    }

    async fn fixture_login(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user_id = FixtureLoginService.authenticate(credentials).await?;
        self.ensure_fixture_user_exists(&user_id).await?;
        Ok(user_id)
    }
}

#[async_trait]
impl<I> LoginService for IdentityLoginService<I>
where
    I: IdentityStore,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let username = Username::new(credentials.username()).map_err(|_| invalid_credentials())?;
        let stored = self
            .identities
            .find_credentials(&username)
            .await
            .map_err(map_identity_error)?;

        match stored {
            Some(StoredCredentials {
                user_id,
                password_hash: Some(phc),
            }) => {
                if verify_password_blocking(credentials.password(), phc).await? {
                    Ok(user_id)
                } else {
                    debug!(user_id = %user_id, "password mismatch");
                    Err(invalid_credentials())
                }
            }
            Some(StoredCredentials { user_id, .. }) if user_id.as_ref() != FIXTURE_USER_ID => {
                debug!(user_id = %user_id, "account has no password");
                Err(invalid_credentials())
            }
            _ => self.fixture_login(credentials).await,
        }
    }
}
