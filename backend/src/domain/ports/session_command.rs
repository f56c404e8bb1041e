//! Driving port for signing in.
//!
//! Inbound adapters exchange validated credentials for a session token
//! without seeing how identities or signing keys are stored.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, SessionToken};

/// Sign-in use-case port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionCommand: Send + Sync {
    /// Authenticate `credentials` and mint a session token for the user.
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<SessionToken, Error>;
}
