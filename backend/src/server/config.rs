//! HTTP server configuration object.

use std::net::SocketAddr;

use focus_backend::domain::SessionTokenIssuer;
use focus_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) issuer: SessionTokenIssuer,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration that uses the in-memory adapters.
    #[must_use]
    pub fn new(issuer: SessionTokenIssuer, bind_addr: SocketAddr) -> Self {
        Self {
            issuer,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When present every store uses its PostgreSQL adapter.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
