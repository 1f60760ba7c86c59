//! Driven port for a single connection to the users table.
//!
//! The connection behaves like a driver with implicit transactions: the first
//! [`UserConnection::execute`] opens a transaction, [`UserConnection::commit`]
//! or [`UserConnection::rollback`] ends it, and [`UserConnection::close`]
//! discards anything still open before releasing the handle.

use async_trait::async_trait;

use crate::domain::{CityUpdate, NewUser, User};

use super::define_port_error;

define_port_error! {
    /// Faults reported by the store during a statement or transaction control call.
    pub enum DataAccessError {
        /// The connection could not be obtained or was lost.
        Connection { message: String } => "database connection failed: {message}",
        /// A statement was rejected or failed while running.
        Query { message: String } => "{message}",
        /// Beginning, committing, or rolling back a transaction failed.
        Transaction { message: String } => "transaction failed: {message}",
    }
}

/// Read statements understood by a [`UserConnection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserQuery {
    /// `SELECT username, name, city FROM users`
    All,
    /// `SELECT username, name, city FROM users WHERE username = $1`
    ByUsername(String),
}

/// Write statements understood by a [`UserConnection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserStatement {
    /// `INSERT INTO users (username, name, city) VALUES ($1, $2, $3)`
    Insert(NewUser),
    /// `UPDATE users SET city = $1 WHERE username = $2`
    UpdateCity(CityUpdate),
}

/// One checked-out connection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserConnection: Send {
    /// Run a read statement, returning rows in storage order.
    async fn query(&mut self, query: UserQuery) -> Result<Vec<User>, DataAccessError>;

    /// Run a write statement, returning the affected row count.
    async fn execute(&mut self, statement: UserStatement) -> Result<usize, DataAccessError>;

    /// Commit the open transaction, if any.
    async fn commit(&mut self) -> Result<(), DataAccessError>;

    /// Roll back the open transaction, if any.
    async fn rollback(&mut self) -> Result<(), DataAccessError>;

    /// Release the connection. Calls after the first are no-ops.
    async fn close(&mut self) -> Result<(), DataAccessError>;
}
