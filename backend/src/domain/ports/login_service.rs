//! Driving port for credential checks.
//!
//! Password verification lives outside this service; adapters decide how
//! credentials map to a user id. HTTP tests substitute a double instead of
//! wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Identifier of the built-in development account.
pub const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";
/// Username of the built-in development account.
pub const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";

/// Authentication use-case port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

/// Development authenticator: `admin` / `password` maps to [`FIXTURE_USER_ID`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == FIXTURE_USERNAME && credentials.password() == FIXTURE_PASSWORD
        {
            UserId::new(FIXTURE_USER_ID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
