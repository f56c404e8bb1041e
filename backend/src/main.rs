//! Backend entry-point: loads configuration, prepares storage, and serves
//! the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use focus_backend::domain::SessionTokenIssuer;
use focus_backend::inbound::http::health::HealthState;
use focus_backend::inbound::http::token_config::fingerprint::secret_fingerprint;
use focus_backend::inbound::http::token_config::{AppSettings, BuildMode, settings_from_env};
use focus_backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let AppSettings {
        secret,
        database_url,
        bind_addr,
    } = settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %secret_fingerprint(&secret), "token signing secret loaded");

    let issuer = SessionTokenIssuer::new(&secret, Arc::new(DefaultClock));
    let mut config = ServerConfig::new(issuer, bind_addr);
    if let Some(url) = database_url {
        run_migrations(&url).await.map_err(std::io::Error::other)?;
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting HTTP server");
    create_server(health_state, config)?.await
}

#[cfg(test)]
mod tests;
