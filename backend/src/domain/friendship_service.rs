//! Friendship lifecycle service.
//!
//! Requests start `Pending`; only the target may accept or reject them, and
//! resolved edges are never changed again.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::authorization::map_ledger_error;
use crate::domain::ports::{
    FriendRequestDecision, FriendshipCommand, FriendshipLedger, FriendshipQuery, IdentityStore,
};
use crate::domain::session_service::map_identity_error;
use crate::domain::{Error, Friendship, FriendshipStatus, UserId};

/// Friendship service implementing the friendship driving ports.
#[derive(Clone)]
pub struct FriendshipService<L, I> {
    ledger: Arc<L>,
    identities: Arc<I>,
}

impl<L, I> FriendshipService<L, I> {
    /// Create a service over the ledger and identity store.
    pub fn new(ledger: Arc<L>, identities: Arc<I>) -> Self {
        Self { ledger, identities }
    }
}

#[async_trait]
impl<L, I> FriendshipCommand for FriendshipService<L, I>
where
    L: FriendshipLedger,
    I: IdentityStore,
{
    async fn send_request(&self, requester: &UserId, target: &UserId) -> Result<Friendship, Error> {
        if requester == target {
            return Err(Error::invalid_request("cannot send a friend request to yourself"));
        }

        let exists = self
            .identities
            .get_user_by_id(target)
            .await
            .map_err(map_identity_error)?
            .is_some();
        if !exists {
            return Err(Error::not_found("user not found")
                .with_details(json!({ "userId": target.as_ref() })));
        }

        if let Some(existing) = self
            .ledger
            .find_edge(requester, target)
            .await
            .map_err(map_ledger_error)?
        {
            return Err(Error::conflict("a friendship already exists for this pair")
                .with_details(json!({ "status": existing.status() })));
        }

        let edge = Friendship::pending(requester.clone(), target.clone());
        self.ledger
            .insert_pending(&edge)
            .await
            .map_err(map_ledger_error)?;
        info!(requester = %requester, target = %target, "friend request sent");
        Ok(edge)
    }

    async fn respond(
        &self,
        responder: &UserId,
        requester: &UserId,
        decision: FriendRequestDecision,
    ) -> Result<Friendship, Error> {
        let pending = self
            .ledger
            .find_edge(requester, responder)
            .await
            .map_err(map_ledger_error)?
            .filter(|edge| edge.requester_id() == requester && edge.target_id() == responder)
            .ok_or_else(|| Error::not_found("no friend request from this user"))?;

        if pending.status() != FriendshipStatus::Pending {
            return Err(Error::conflict("friend request already resolved")
                .with_details(json!({ "status": pending.status() })));
        }

        let status = match decision {
            FriendRequestDecision::Accept => FriendshipStatus::Accepted,
            FriendRequestDecision::Reject => FriendshipStatus::Rejected,
        };
        let resolved = self
            .ledger
            .resolve(requester, responder, status)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::conflict("friend request already resolved"))?;
        info!(requester = %requester, target = %responder, %status, "friend request resolved");
        Ok(resolved)
    }
}

#[async_trait]
impl<L, I> FriendshipQuery for FriendshipService<L, I>
where
    L: FriendshipLedger,
    I: IdentityStore,
{
    async fn list_friends(&self, user: &UserId) -> Result<Vec<UserId>, Error> {
        let edges = self
            .ledger
            .list_accepted_for(user)
            .await
            .map_err(map_ledger_error)?;
        Ok(edges
            .iter()
            .filter_map(|edge| edge.other_party(user).cloned())
            .collect())
    }
}
