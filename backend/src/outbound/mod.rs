//! Outbound adapters implementing the connection ports.
//!
//! - **persistence**: PostgreSQL via Diesel, used when a database URL is set
//! - **memory**: an in-process table for local runs and tests
//!
//! Adapters translate typed statements into storage operations. They contain
//! no business logic.

pub mod memory;
pub mod persistence;
