//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod connection_provider;
mod user_connection;

#[cfg(test)]
pub use connection_provider::MockConnectionProvider;
pub use connection_provider::ConnectionProvider;
#[cfg(test)]
pub use user_connection::MockUserConnection;
pub use user_connection::{DataAccessError, UserConnection, UserQuery, UserStatement};
