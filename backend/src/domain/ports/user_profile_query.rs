//! Driving port for reading the caller's own profile.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Profile lookup use-case port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for `user_id`.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}
