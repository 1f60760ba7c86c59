//! PostgreSQL-backed connection ports using Diesel ORM.
//!
//! [`DieselConnectionProvider`] checks connections out of a [`DbPool`];
//! [`DieselUserConnection`] runs the users statements on one of them and
//! drives its transaction through the Diesel transaction manager.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Varchar};
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use tracing::debug;

use crate::domain::User;
use crate::domain::ports::{
    ConnectionProvider, DataAccessError, UserConnection, UserQuery, UserStatement,
};

use super::error_mapping::{map_diesel_error, map_pool_error, map_transaction_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

const UPDATE_CITY_SQL: &str = "UPDATE users SET city = $1 WHERE username = $2";

/// Diesel-backed implementation of the [`ConnectionProvider`] port.
#[derive(Clone)]
pub struct DieselConnectionProvider {
    pool: DbPool,
}

impl DieselConnectionProvider {
    /// Create a provider drawing from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionProvider for DieselConnectionProvider {
    async fn acquire(&self) -> Result<Box<dyn UserConnection>, DataAccessError> {
        let conn = self.pool.get_owned().await.map_err(map_pool_error)?;
        Ok(Box::new(DieselUserConnection::new(conn)))
    }
}

/// One pooled PostgreSQL connection.
///
/// The first write opens a transaction. Closing returns the connection to
/// the pool after rolling back anything still open.
pub struct DieselUserConnection {
    conn: Option<PooledConnection<'static, AsyncPgConnection>>,
    in_transaction: bool,
}

impl DieselUserConnection {
    fn new(conn: PooledConnection<'static, AsyncPgConnection>) -> Self {
        Self {
            conn: Some(conn),
            in_transaction: false,
        }
    }

    fn connection(&mut self) -> Result<&mut AsyncPgConnection, DataAccessError> {
        self.conn
            .as_deref_mut()
            .ok_or_else(|| DataAccessError::connection("connection already closed"))
    }

    async fn begin_if_idle(&mut self) -> Result<(), DataAccessError> {
        if self.in_transaction {
            return Ok(());
        }
        let conn = self.connection()?;
        AnsiTransactionManager::begin_transaction(conn)
            .await
            .map_err(map_transaction_error)?;
        self.in_transaction = true;
        Ok(())
    }
}

async fn run_statement(
    conn: &mut AsyncPgConnection,
    statement: UserStatement,
) -> QueryResult<usize> {
    match statement {
        UserStatement::Insert(new_user) => {
            diesel::insert_into(users::table)
                .values(NewUserRow::from(&new_user))
                .execute(conn)
                .await
        }
        // The DSL only assigns non-null values to a NOT NULL column; a raw
        // statement lets an explicit null reach the constraint.
        UserStatement::UpdateCity(update) => {
            diesel::sql_query(UPDATE_CITY_SQL)
                .bind::<Nullable<Varchar>, _>(update.city.as_deref())
                .bind::<Varchar, _>(update.username.as_str())
                .execute(conn)
                .await
        }
    }
}

#[async_trait]
impl UserConnection for DieselUserConnection {
    async fn query(&mut self, query: UserQuery) -> Result<Vec<User>, DataAccessError> {
        let conn = self.connection()?;
        let rows = match query {
            UserQuery::All => {
                users::table
                    .select(UserRow::as_select())
                    .load(conn)
                    .await
            }
            UserQuery::ByUsername(username) => {
                users::table
                    .filter(users::username.eq(username))
                    .select(UserRow::as_select())
                    .load(conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn execute(&mut self, statement: UserStatement) -> Result<usize, DataAccessError> {
        self.begin_if_idle().await?;
        let conn = self.connection()?;
        run_statement(conn, statement)
            .await
            .map_err(map_diesel_error)
    }

    async fn commit(&mut self) -> Result<(), DataAccessError> {
        if !self.in_transaction {
            return Ok(());
        }
        let conn = self.connection()?;
        AnsiTransactionManager::commit_transaction(conn)
            .await
            .map_err(map_transaction_error)?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DataAccessError> {
        if !self.in_transaction {
            return Ok(());
        }
        self.in_transaction = false;
        let conn = self.connection()?;
        AnsiTransactionManager::rollback_transaction(conn)
            .await
            .map_err(map_transaction_error)
    }

    async fn close(&mut self) -> Result<(), DataAccessError> {
        if self.conn.is_none() {
            return Ok(());
        }
        let outcome = if self.in_transaction {
            debug!("rolling back open transaction before release");
            self.rollback().await
        } else {
            Ok(())
        };
        self.conn = None;
        outcome
    }
}
