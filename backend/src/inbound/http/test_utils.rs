//! Test helpers for inbound HTTP components.
//!
//! [`TestHarness`] wires the real domain services over in-memory adapters so
//! handler tests exercise the full request path without PostgreSQL.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use crate::domain::ports::{FriendshipLedger, LoginService};
use crate::domain::password::test_hashes::hash;
use crate::domain::{
    Friendship, FriendshipService, FriendshipStatus, IdentityLoginService, ProfileService,
    SessionService, SessionTokenIssuer, SigningSecret, StatisticsAggregator, StatisticsReader,
    User, UserId,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{
    InMemoryFriendshipLedger, InMemoryIdentityStore, InMemoryStatisticsStore,
};

const TEST_SECRET: &[u8] = b"test-signing-secret-with-32-bytes!!";

/// In-memory application state plus handles to its stores.
pub struct TestHarness {
    identities: Arc<InMemoryIdentityStore>,
    ledger: Arc<InMemoryFriendshipLedger>,
    issuer: SessionTokenIssuer,
    state: web::Data<HttpState>,
}

impl TestHarness {
    pub fn new() -> Self {
        let secret = SigningSecret::new(TEST_SECRET.to_vec()).expect("non-empty secret");
        let issuer = SessionTokenIssuer::new(&secret, Arc::new(DefaultClock));
        let identities = Arc::new(InMemoryIdentityStore::default());
        let ledger = Arc::new(InMemoryFriendshipLedger::default());
        let statistics = Arc::new(InMemoryStatisticsStore::default());

        let login: Arc<dyn LoginService> =
            Arc::new(IdentityLoginService::new(identities.clone()));
        let friendships = Arc::new(FriendshipService::new(ledger.clone(), identities.clone()));
        let ports = HttpStatePorts {
            sessions: Arc::new(SessionService::new(
                login,
                identities.clone(),
                issuer.clone(),
            )),
            profile: Arc::new(ProfileService::new(identities.clone())),
            statistics: Arc::new(StatisticsAggregator::new(statistics.clone())),
            statistics_query: Arc::new(StatisticsReader::new(statistics, ledger.clone())),
            friendships: friendships.clone(),
            friendships_query: friendships,
        };
        let state = web::Data::new(HttpState::new(ports, issuer.clone()));

        Self {
            identities,
            ledger,
            issuer,
            state,
        }
    }

    pub fn state(&self) -> web::Data<HttpState> {
        self.state.clone()
    }

    /// Store a user whose id and username are both `name`.
    pub fn register_user(&self, name: &str) -> UserId {
        let user = User::try_from_strings(name, name, None).expect("valid test user");
        let id = user.id().clone();
        self.identities.insert(user);
        id
    }

    /// Store a user who can log in as `name` with `password`.
    pub fn register_user_with_password(&self, name: &str, password: &str) -> UserId {
        let id = self.register_user(name);
        self.identities.set_password_hash(&id, hash(password));
        id
    }

    /// Record an accepted friendship `a -> b`.
    pub async fn befriend(&self, a: &UserId, b: &UserId) {
        self.ledger
            .insert_pending(&Friendship::pending(a.clone(), b.clone()))
            .await
            .expect("insert edge");
        self.ledger
            .resolve(a, b, FriendshipStatus::Accepted)
            .await
            .expect("resolve edge")
            .expect("pending edge exists");
    }

    /// Sign a token for `id` without going through login.
    pub fn token_for(&self, id: &UserId) -> String {
        let user = User::try_from_strings(id.as_ref(), id.as_ref(), None).expect("valid user");
        self.issuer
            .issue(&user)
            .expect("token issued")
            .token()
            .to_owned()
    }
}

/// `Authorization` header value for `id`.
pub fn bearer_for(harness: &TestHarness, id: &UserId) -> String {
    format!("Bearer {}", harness.token_for(id))
}
