//! Request-to-transaction pipeline for the users table.
//!
//! Each operation validates its payload (writes only), checks out one
//! connection, runs one statement, and folds the outcome into an
//! [`Envelope`]. Writes commit on success and roll back on any fault; a failed
//! rollback is logged and the caller still sees the original fault. The
//! connection is closed on every exit path reached after it was acquired.
//!
//! ```text
//! VALIDATING -> API_ERROR
//!            -> CONNECTING -> EXECUTING -> ROLLING_BACK -> INTERNAL_ERROR
//!                                       -> COMMITTING   -> SUCCESS
//! ```

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::envelope::{Envelope, UserLookup};
use super::error::UsersError;
use super::payload::{CityUpdate, CreateUserPayload, NewUser, UpdateCityPayload};
use super::ports::{ConnectionProvider, DataAccessError, UserConnection, UserQuery, UserStatement};
use super::user::User;

/// Confirmation returned by a successful create.
pub const USER_INSERTED: &str = "user inserted successfully";
/// Confirmation returned by a successful update.
pub const USER_UPDATED: &str = "user updated successfully";

/// Users operations over connections supplied by a [`ConnectionProvider`].
///
/// The provider is injected; the service holds no connection between calls.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use users_backend::domain::{StatusKind, UsersService};
/// use users_backend::outbound::memory::InMemoryUserStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let service = UsersService::new(Arc::new(InMemoryUserStore::new()));
/// let envelope = service.list_users().await;
/// assert_eq!(envelope.status(), StatusKind::Success);
/// # });
/// ```
#[derive(Clone)]
pub struct UsersService {
    connections: Arc<dyn ConnectionProvider>,
}

impl UsersService {
    /// Create a service drawing connections from `connections`.
    pub fn new(connections: Arc<dyn ConnectionProvider>) -> Self {
        Self { connections }
    }

    /// Return every user in storage order.
    pub async fn list_users(&self) -> Envelope<Vec<User>> {
        info!("listing users");
        let result = self.read(UserQuery::All).await.map_err(UsersError::from);
        respond("list users", result)
    }

    /// Return the user keyed by `username`, or an empty mapping on a miss.
    pub async fn get_user(&self, username: &str) -> Envelope<UserLookup> {
        info!(%username, "fetching user");
        let result = self
            .read(UserQuery::ByUsername(username.to_owned()))
            .await
            .map(|rows| UserLookup::from(rows.into_iter().next()))
            .map_err(UsersError::from);
        respond("get user", result)
    }

    /// Insert a user. Only `city` is checked for presence.
    pub async fn create_user(&self, payload: CreateUserPayload) -> Envelope<String> {
        info!("creating user");
        debug!(?payload, "create user payload");
        respond("create user", self.create(payload).await)
    }

    /// Set the city of the user keyed by `username`.
    ///
    /// A key that matches no row still reports success.
    pub async fn update_user(&self, username: &str, payload: UpdateCityPayload) -> Envelope<String> {
        info!(%username, "updating user city");
        debug!(?payload, "update user payload");
        respond("update user", self.update(username, payload).await)
    }

    async fn create(&self, payload: CreateUserPayload) -> Result<String, UsersError> {
        let new_user = NewUser::try_from(payload)?;
        self.write(UserStatement::Insert(new_user)).await?;
        Ok(USER_INSERTED.to_owned())
    }

    async fn update(&self, username: &str, payload: UpdateCityPayload) -> Result<String, UsersError> {
        let update = CityUpdate::try_from_parts(username, payload)?;
        let affected = self.write(UserStatement::UpdateCity(update)).await?;
        debug!(%username, affected, "city update applied");
        Ok(USER_UPDATED.to_owned())
    }

    async fn read(&self, query: UserQuery) -> Result<Vec<User>, DataAccessError> {
        let mut conn = self.connections.acquire().await?;
        let rows = conn.query(query).await;
        release(&mut conn).await;
        rows
    }

    async fn write(&self, statement: UserStatement) -> Result<usize, DataAccessError> {
        let mut conn = self.connections.acquire().await?;
        let outcome = execute_and_commit(&mut conn, statement).await;
        if let Err(fault) = &outcome {
            if let Err(rollback_fault) = conn.rollback().await {
                warn!(%fault, error = %rollback_fault, "rollback failed");
            }
        }
        release(&mut conn).await;
        outcome
    }
}

async fn execute_and_commit(
    conn: &mut Box<dyn UserConnection>,
    statement: UserStatement,
) -> Result<usize, DataAccessError> {
    let affected = conn.execute(statement).await?;
    conn.commit().await?;
    Ok(affected)
}

async fn release(conn: &mut Box<dyn UserConnection>) {
    if let Err(err) = conn.close().await {
        error!(error = %err, "failed to release connection");
    }
}

fn respond<T>(operation: &'static str, result: Result<T, UsersError>) -> Envelope<T> {
    match &result {
        Ok(_) => {}
        Err(err @ UsersError::Validation(_)) => warn!(operation, error = %err, "request rejected"),
        Err(err @ UsersError::DataAccess(_)) => error!(operation, error = %err, "data access failed"),
    }
    Envelope::from_result(result)
}
