//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module implements the connection ports against PostgreSQL via Diesel
//! with async support through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the connection only translates typed statements into
//!   Diesel queries. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) never reach the domain layer.
//! - **Async-safe pooling**: connections are owned checkouts from a `bb8`
//!   pool and return to it when closed.
//! - **Strongly typed errors**: database errors become `DataAccessError`
//!   values carrying the database's own message.
//!
//! # Example
//!
//! ```no_run
//! use users_backend::outbound::persistence::{DbPool, DieselConnectionProvider, PoolConfig};
//!
//! # async fn demo() -> Result<(), users_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
//! let provider = DieselConnectionProvider::new(pool);
//! # drop(provider);
//! # Ok(())
//! # }
//! ```

mod diesel_user_connection;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_connection::{DieselConnectionProvider, DieselUserConnection};
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
