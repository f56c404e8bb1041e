//! Friendship edges between users.
//!
//! An edge is created `Pending` by its requester and resolved once by its
//! target. Accepted edges are undirected for authorisation purposes, so
//! lookups must treat `(a, b)` and `(b, a)` as the same pair.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Lifecycle state of a friendship edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    /// Requested but not yet answered by the target.
    Pending,
    /// Accepted by the target; grants mutual read access.
    Accepted,
    /// Declined by the target.
    Rejected,
}

impl FriendshipStatus {
    /// Storage label for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status label is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown friendship status: {0}")]
pub struct UnknownFriendshipStatus(pub String);

impl std::str::FromStr for FriendshipStatus {
    type Err = UnknownFriendshipStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownFriendshipStatus(other.to_owned())),
        }
    }
}

/// Directed friendship edge as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friendship {
    requester_id: UserId,
    target_id: UserId,
    status: FriendshipStatus,
}

impl Friendship {
    /// Build an edge from its stored parts.
    pub fn new(requester_id: UserId, target_id: UserId, status: FriendshipStatus) -> Self {
        Self {
            requester_id,
            target_id,
            status,
        }
    }

    /// Fresh pending request from `requester_id` to `target_id`.
    pub fn pending(requester_id: UserId, target_id: UserId) -> Self {
        Self::new(requester_id, target_id, FriendshipStatus::Pending)
    }

    /// User who sent the request.
    pub fn requester_id(&self) -> &UserId {
        &self.requester_id
    }

    /// User who received the request.
    pub fn target_id(&self) -> &UserId {
        &self.target_id
    }

    /// Current lifecycle state.
    pub fn status(&self) -> FriendshipStatus {
        self.status
    }

    /// Whether the edge grants mutual access.
    pub fn is_accepted(&self) -> bool {
        self.status == FriendshipStatus::Accepted
    }

    /// Whether this edge links `a` and `b`, in either direction.
    pub fn connects(&self, a: &UserId, b: &UserId) -> bool {
        (&self.requester_id == a && &self.target_id == b)
            || (&self.requester_id == b && &self.target_id == a)
    }

    /// The endpoint that is not `user`, if `user` is an endpoint at all.
    pub fn other_party(&self, user: &UserId) -> Option<&UserId> {
        if &self.requester_id == user {
            Some(&self.target_id)
        } else if &self.target_id == user {
            Some(&self.requester_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn alice() -> UserId {
        UserId::new("alice").expect("valid id")
    }

    #[fixture]
    fn bob() -> UserId {
        UserId::new("bob").expect("valid id")
    }

    #[rstest]
    fn connects_is_direction_independent(alice: UserId, bob: UserId) {
        let edge = Friendship::new(alice.clone(), bob.clone(), FriendshipStatus::Accepted);
        assert!(edge.connects(&alice, &bob));
        assert!(edge.connects(&bob, &alice));
    }

    #[rstest]
    fn other_party_resolves_both_endpoints(alice: UserId, bob: UserId) {
        let edge = Friendship::pending(alice.clone(), bob.clone());
        assert_eq!(edge.other_party(&alice), Some(&bob));
        assert_eq!(edge.other_party(&bob), Some(&alice));
        let carol = UserId::new("carol").expect("valid id");
        assert_eq!(edge.other_party(&carol), None);
    }

    #[rstest]
    #[case(FriendshipStatus::Pending)]
    #[case(FriendshipStatus::Accepted)]
    #[case(FriendshipStatus::Rejected)]
    fn status_labels_parse_back(#[case] status: FriendshipStatus) {
        assert_eq!(status.as_str().parse::<FriendshipStatus>(), Ok(status));
    }

    #[rstest]
    fn unknown_status_label_is_rejected() {
        assert!("blocked".parse::<FriendshipStatus>().is_err());
    }
}
