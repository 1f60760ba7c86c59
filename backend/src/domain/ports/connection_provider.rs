//! Driven port supplying connections on demand.
//!
//! Implementations own pooling and connection set-up. Callers hold a
//! connection for exactly one request and close it on every exit path.

use async_trait::async_trait;

use super::{DataAccessError, UserConnection};

/// Source of [`UserConnection`] handles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Check out a connection.
    async fn acquire(&self) -> Result<Box<dyn UserConnection>, DataAccessError>;
}
