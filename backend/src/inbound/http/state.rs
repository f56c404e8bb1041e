//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they stay testable with mocks or in-memory adapters.

use std::sync::Arc;

use crate::domain::SessionTokenIssuer;
use crate::domain::ports::{
    DailyStatisticsCommand, DailyStatisticsQuery, FriendshipCommand, FriendshipQuery,
    SessionCommand, UserProfileQuery,
};

/// Parameter object bundling the driving ports.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub sessions: Arc<dyn SessionCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub statistics: Arc<dyn DailyStatisticsCommand>,
    pub statistics_query: Arc<dyn DailyStatisticsQuery>,
    pub friendships: Arc<dyn FriendshipCommand>,
    pub friendships_query: Arc<dyn FriendshipQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub sessions: Arc<dyn SessionCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub statistics: Arc<dyn DailyStatisticsCommand>,
    pub statistics_query: Arc<dyn DailyStatisticsQuery>,
    pub friendships: Arc<dyn FriendshipCommand>,
    pub friendships_query: Arc<dyn FriendshipQuery>,
    /// Verifies bearer tokens in [`super::auth::BearerUser`].
    pub issuer: SessionTokenIssuer,
}

impl HttpState {
    /// Construct state from the ports bundle and the token issuer.
    pub fn new(ports: HttpStatePorts, issuer: SessionTokenIssuer) -> Self {
        let HttpStatePorts {
            sessions,
            profile,
            statistics,
            statistics_query,
            friendships,
            friendships_query,
        } = ports;
        Self {
            sessions,
            profile,
            statistics,
            statistics_query,
            friendships,
            friendships_query,
            issuer,
        }
    }
}
