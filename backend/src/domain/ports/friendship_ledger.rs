//! Driven port for friendship edges.
//!
//! Adapters store at most one edge per unordered pair of users. Lookups
//! taking two identifiers must match the edge in either direction.
use async_trait::async_trait;

use crate::domain::{Friendship, FriendshipStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by friendship ledger adapters.
    pub enum FriendshipLedgerError {
        /// Ledger connection could not be established.
        Connection { message: String } => "friendship ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "friendship ledger query failed: {message}",
        /// An edge already exists for the pair.
        Conflict { message: String } => "friendship ledger conflict: {message}",
    }
}

/// Storage for friendship edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendshipLedger: Send + Sync {
    /// Accepted edge linking `a` and `b`, stored in either direction.
    async fn find_accepted_edge(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipLedgerError>;

    /// Edge linking `a` and `b` in any status, stored in either direction.
    async fn find_edge(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipLedgerError>;

    /// Store a new pending edge.
    ///
    /// Fails with [`FriendshipLedgerError::Conflict`] when the unordered pair
    /// already has an edge.
    async fn insert_pending(&self, edge: &Friendship) -> Result<(), FriendshipLedgerError>;

    /// Move the pending edge `requester -> target` to `status`.
    ///
    /// Returns `None` when no pending edge in that direction exists, so a
    /// concurrent resolution is observed as absence.
    async fn resolve(
        &self,
        requester: &UserId,
        target: &UserId,
        status: FriendshipStatus,
    ) -> Result<Option<Friendship>, FriendshipLedgerError>;

    /// Accepted edges with `user` at either end.
    async fn list_accepted_for(&self, user: &UserId)
    -> Result<Vec<Friendship>, FriendshipLedgerError>;
}
