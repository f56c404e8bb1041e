//! Friend-scoped read authorisation.
//!
//! A caller may read their own data, or the data of a user they share an
//! accepted friendship with. The gate never reveals whether the target
//! exists: a missing friendship is always `Forbidden`.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{FriendshipLedger, FriendshipLedgerError};
use crate::domain::{Error, UserId};

/// Resolves whose data a request may read.
#[derive(Clone)]
pub struct FriendAccessGate<L> {
    ledger: Arc<L>,
}

impl<L> FriendAccessGate<L> {
    /// Create a gate backed by `ledger`.
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }
}

impl<L> FriendAccessGate<L>
where
    L: FriendshipLedger,
{
    /// Effective target for `requester` asking about `friend_id`.
    ///
    /// No friend, or the caller themselves, resolves to `requester` without
    /// touching the ledger.
    pub async fn resolve_target_user(
        &self,
        requester: &UserId,
        friend_id: Option<&UserId>,
    ) -> Result<UserId, Error> {
        let Some(friend_id) = friend_id.filter(|friend| *friend != requester) else {
            return Ok(requester.clone());
        };

        let edge = self
            .ledger
            .find_accepted_edge(requester, friend_id)
            .await
            .map_err(map_ledger_error)?;

        match edge {
            Some(edge) if edge.is_accepted() && edge.connects(requester, friend_id) => {
                Ok(friend_id.clone())
            }
            _ => {
                debug!(requester = %requester, friend = %friend_id, "friend access denied");
                Err(Error::forbidden("not friends with the requested user"))
            }
        }
    }
}

pub(crate) fn map_ledger_error(error: FriendshipLedgerError) -> Error {
    match error {
        FriendshipLedgerError::Connection { message } => {
            Error::service_unavailable(format!("friendship ledger unavailable: {message}"))
        }
        FriendshipLedgerError::Query { message } => {
            Error::internal(format!("friendship ledger error: {message}"))
        }
        FriendshipLedgerError::Conflict { message } => {
            Error::conflict(format!("friendship already exists: {message}"))
        }
    }
}
