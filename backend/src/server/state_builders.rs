//! Builders selecting the storage adapter behind the HTTP state.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use users_backend::domain::ports::ConnectionProvider;
use users_backend::inbound::http::state::HttpState;
use users_backend::outbound::memory::InMemoryUserStore;
use users_backend::outbound::persistence::DieselConnectionProvider;

use super::ServerConfig;

/// Pick the connection source: an injected provider first, then the
/// PostgreSQL pool, then a fresh in-memory table.
pub(crate) fn build_connection_provider(config: &ServerConfig) -> Arc<dyn ConnectionProvider> {
    if let Some(connections) = &config.connections {
        return Arc::clone(connections);
    }
    match &config.db_pool {
        Some(pool) => {
            info!("serving users from PostgreSQL");
            Arc::new(DieselConnectionProvider::new(pool.clone()))
        }
        None => {
            warn!("no database configured; serving users from an in-memory table");
            Arc::new(InMemoryUserStore::new())
        }
    }
}

/// Build the shared HTTP state for the configured storage adapter.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(build_connection_provider(config)))
}
