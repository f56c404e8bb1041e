//! In-memory `FriendshipLedger`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{FriendshipLedger, FriendshipLedgerError};
use crate::domain::{Friendship, FriendshipStatus, UserId};

use super::lock;

/// Edges in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryFriendshipLedger {
    edges: Mutex<Vec<Friendship>>,
}

#[async_trait]
impl FriendshipLedger for InMemoryFriendshipLedger {
    async fn find_accepted_edge(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipLedgerError> {
        Ok(lock(&self.edges)
            .iter()
            .find(|edge| edge.is_accepted() && edge.connects(a, b))
            .cloned())
    }

    async fn find_edge(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, FriendshipLedgerError> {
        Ok(lock(&self.edges)
            .iter()
            .find(|edge| edge.connects(a, b))
            .cloned())
    }

    async fn insert_pending(&self, edge: &Friendship) -> Result<(), FriendshipLedgerError> {
        let mut edges = lock(&self.edges);
        if edges
            .iter()
            .any(|existing| existing.connects(edge.requester_id(), edge.target_id()))
        {
            return Err(FriendshipLedgerError::conflict(
                "friendship already exists for this pair",
            ));
        }
        edges.push(Friendship::pending(
            edge.requester_id().clone(),
            edge.target_id().clone(),
        ));
        Ok(())
    }

    async fn resolve(
        &self,
        requester: &UserId,
        target: &UserId,
        status: FriendshipStatus,
    ) -> Result<Option<Friendship>, FriendshipLedgerError> {
        let mut edges = lock(&self.edges);
        let Some(slot) = edges.iter_mut().find(|edge| {
            edge.requester_id() == requester
                && edge.target_id() == target
                && edge.status() == FriendshipStatus::Pending
        }) else {
            return Ok(None);
        };
        *slot = Friendship::new(requester.clone(), target.clone(), status);
        Ok(Some(slot.clone()))
    }

    async fn list_accepted_for(
        &self,
        user: &UserId,
    ) -> Result<Vec<Friendship>, FriendshipLedgerError> {
        Ok(lock(&self.edges)
            .iter()
            .filter(|edge| edge.is_accepted() && edge.other_party(user).is_some())
            .cloned()
            .collect())
    }
}
