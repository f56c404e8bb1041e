//! Builders wiring domain services to storage adapters.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use focus_backend::domain::ports::{
    FriendshipLedger, IdentityStore, LoginService, StatisticsStore,
};
use focus_backend::domain::{
    FriendshipService, IdentityLoginService, ProfileService, SessionService, SessionTokenIssuer,
    StatisticsAggregator, StatisticsReader,
};
use focus_backend::inbound::http::state::{HttpState, HttpStatePorts};
use focus_backend::outbound::memory::{
    InMemoryFriendshipLedger, InMemoryIdentityStore, InMemoryStatisticsStore,
};
use focus_backend::outbound::persistence::{
    DieselFriendshipLedger, DieselIdentityStore, DieselStatisticsStore,
};

use super::ServerConfig;

/// Storage adapters backing one application instance.
struct Stores<I, L, S> {
    identities: Arc<I>,
    ledger: Arc<L>,
    statistics: Arc<S>,
}

fn build_ports<I, L, S>(stores: Stores<I, L, S>, issuer: &SessionTokenIssuer) -> HttpStatePorts
where
    I: IdentityStore + 'static,
    L: FriendshipLedger + 'static,
    S: StatisticsStore + 'static,
{
    let Stores {
        identities,
        ledger,
        statistics,
    } = stores;
    let login: Arc<dyn LoginService> =
        Arc::new(IdentityLoginService::new(identities.clone()));
    let friendships = Arc::new(FriendshipService::new(ledger.clone(), identities.clone()));

    HttpStatePorts {
        sessions: Arc::new(SessionService::new(
            login,
            identities.clone(),
            issuer.clone(),
        )),
        profile: Arc::new(ProfileService::new(identities)),
        statistics: Arc::new(StatisticsAggregator::new(statistics.clone())),
        statistics_query: Arc::new(StatisticsReader::new(statistics, ledger)),
        friendships: friendships.clone(),
        friendships_query: friendships,
    }
}

/// Build handler state, using PostgreSQL when a pool is configured and the
/// in-memory adapters otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL adapters");
            build_ports(
                Stores {
                    identities: Arc::new(DieselIdentityStore::new(pool.clone())),
                    ledger: Arc::new(DieselFriendshipLedger::new(pool.clone())),
                    statistics: Arc::new(DieselStatisticsStore::new(pool.clone())),
                },
                &config.issuer,
            )
        }
        None => {
            info!("DATABASE_URL not set; using in-memory adapters");
            build_ports(
                Stores {
                    identities: Arc::new(InMemoryIdentityStore::default()),
                    ledger: Arc::new(InMemoryFriendshipLedger::default()),
                    statistics: Arc::new(InMemoryStatisticsStore::default()),
                },
                &config.issuer,
            )
        }
    };
    web::Data::new(HttpState::new(ports, config.issuer.clone()))
}
