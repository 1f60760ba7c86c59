//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use users_backend::domain::ports::ConnectionProvider;
use users_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) connections: Option<Arc<dyn ConnectionProvider>>,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            connections: None,
        }
    }

    /// Attach a database connection pool for the PostgreSQL adapter.
    ///
    /// Without a pool the server runs on an in-memory users table.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Use `connections` directly, overriding any pool.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by server tests to inject a store")
    )]
    #[must_use]
    pub fn with_connections(mut self, connections: Arc<dyn ConnectionProvider>) -> Self {
        self.connections = Some(connections);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by server tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
