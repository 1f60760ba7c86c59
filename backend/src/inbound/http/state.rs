//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the users service and the connection port, and remain testable without
//! a database.

use std::sync::Arc;

use crate::domain::UsersService;
use crate::domain::ports::ConnectionProvider;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Users pipeline behind the CRUD endpoints.
    pub users: UsersService,
    /// Connection source exercised by the readiness check.
    pub connections: Arc<dyn ConnectionProvider>,
}

impl HttpState {
    /// Build state whose service and readiness check share `connections`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use users_backend::inbound::http::state::HttpState;
    /// use users_backend::outbound::memory::InMemoryUserStore;
    ///
    /// let state = HttpState::new(Arc::new(InMemoryUserStore::new()));
    /// # drop(state);
    /// ```
    pub fn new(connections: Arc<dyn ConnectionProvider>) -> Self {
        Self {
            users: UsersService::new(Arc::clone(&connections)),
            connections,
        }
    }
}
