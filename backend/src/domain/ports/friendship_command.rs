//! Driving ports for the friendship lifecycle.

use async_trait::async_trait;

use crate::domain::{Error, Friendship, UserId};

/// Answer given by the target of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendRequestDecision {
    /// Grant mutual access.
    Accept,
    /// Decline the request.
    Reject,
}

/// Friendship write use-case port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipCommand: Send + Sync {
    /// Send a friend request from `requester` to `target`.
    async fn send_request(&self, requester: &UserId, target: &UserId) -> Result<Friendship, Error>;

    /// Resolve the pending request `requester -> responder`.
    async fn respond(
        &self,
        responder: &UserId,
        requester: &UserId,
        decision: FriendRequestDecision,
    ) -> Result<Friendship, Error>;
}

/// Friendship read use-case port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipQuery: Send + Sync {
    /// Ids of users with an accepted friendship with `user`.
    async fn list_friends(&self, user: &UserId) -> Result<Vec<UserId>, Error>;
}
