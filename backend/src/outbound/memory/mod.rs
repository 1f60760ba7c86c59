//! In-process users table implementing the connection ports.
//!
//! Used when no database URL is configured and by tests. Each connection keeps
//! a log of the write statements it has run since its last commit; its own
//! reads see the committed rows with that log replayed on top. Commit replays
//! the log against the live rows under the store lock, so concurrent writers
//! merge instead of overwriting each other, and constraints are checked
//! against what is committed at that moment. Rollback and close drop the log.
//! The store enforces the same constraints as the SQL schema: every column is
//! non-null and `username` is unique.
//!
//! Faults can be injected per operation, and counters record how many
//! connections were acquired and closed and how many statements ran.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    ConnectionProvider, DataAccessError, UserConnection, UserQuery, UserStatement,
};
use crate::domain::{CityUpdate, NewUser, User, UserField};

/// Operations on which [`InMemoryUserStore::fail`] can inject a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// [`ConnectionProvider::acquire`].
    Acquire,
    /// [`UserConnection::query`].
    Query,
    /// [`UserConnection::execute`].
    Execute,
    /// [`UserConnection::commit`].
    Commit,
    /// [`UserConnection::rollback`].
    Rollback,
    /// [`UserConnection::close`].
    Close,
}

#[derive(Debug, Default)]
struct StoreState {
    rows: Vec<User>,
    faults: HashMap<StoreOperation, String>,
    acquired: usize,
    closed: usize,
    executed: usize,
}

impl StoreState {
    fn fault(&self, operation: StoreOperation) -> Option<String> {
        self.faults.get(&operation).cloned()
    }
}

/// Shared in-memory users table.
///
/// Cloning yields another handle onto the same table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryUserStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table pre-populated with `users`, in order.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        store.lock().rows.extend(users);
        store
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Make every subsequent `operation` fail with `message`.
    pub fn fail(&self, operation: StoreOperation, message: impl Into<String>) {
        self.lock().faults.insert(operation, message.into());
    }

    /// Stop failing `operation`.
    pub fn clear_fault(&self, operation: StoreOperation) {
        self.lock().faults.remove(&operation);
    }

    /// Committed rows in storage order.
    pub fn users(&self) -> Vec<User> {
        self.lock().rows.clone()
    }

    /// Number of connections handed out.
    pub fn acquired_count(&self) -> usize {
        self.lock().acquired
    }

    /// Number of connections released.
    pub fn closed_count(&self) -> usize {
        self.lock().closed
    }

    /// Number of write statements attempted.
    pub fn executed_count(&self) -> usize {
        self.lock().executed
    }

    /// Connections acquired but not yet released.
    pub fn open_connections(&self) -> usize {
        let state = self.lock();
        state.acquired.saturating_sub(state.closed)
    }
}

#[async_trait]
impl ConnectionProvider for InMemoryUserStore {
    async fn acquire(&self) -> Result<Box<dyn UserConnection>, DataAccessError> {
        let mut state = self.lock();
        if let Some(message) = state.fault(StoreOperation::Acquire) {
            return Err(DataAccessError::connection(message));
        }
        state.acquired += 1;
        Ok(Box::new(InMemoryConnection {
            store: self.clone(),
            pending: Vec::new(),
            closed: false,
        }))
    }
}

/// Connection onto an [`InMemoryUserStore`].
#[derive(Debug)]
pub struct InMemoryConnection {
    store: InMemoryUserStore,
    pending: Vec<UserStatement>,
    closed: bool,
}

impl InMemoryConnection {
    fn ensure_open(&self) -> Result<(), DataAccessError> {
        if self.closed {
            Err(DataAccessError::connection("connection already closed"))
        } else {
            Ok(())
        }
    }

    fn check_fault(&self, operation: StoreOperation) -> Result<(), DataAccessError> {
        match self.store.lock().fault(operation) {
            Some(message) if operation == StoreOperation::Commit => {
                Err(DataAccessError::transaction(message))
            }
            Some(message) => Err(DataAccessError::query(message)),
            None => Ok(()),
        }
    }

    /// Committed rows with this connection's uncommitted statements applied.
    fn own_view(&self) -> Result<Vec<User>, DataAccessError> {
        let mut rows = self.store.users();
        replay(&mut rows, &self.pending)?;
        Ok(rows)
    }
}

fn not_null_violation(field: UserField) -> DataAccessError {
    DataAccessError::query(format!(
        "null value in column \"{field}\" of relation \"users\" violates not-null constraint"
    ))
}

fn insert_row(rows: &mut Vec<User>, new_user: &NewUser) -> Result<usize, DataAccessError> {
    let username = new_user
        .username
        .as_deref()
        .ok_or_else(|| not_null_violation(UserField::Username))?;
    let name = new_user
        .name
        .as_deref()
        .ok_or_else(|| not_null_violation(UserField::Name))?;
    let city = new_user
        .city
        .as_deref()
        .ok_or_else(|| not_null_violation(UserField::City))?;
    if rows.iter().any(|row| row.username() == username) {
        return Err(DataAccessError::query(format!(
            "duplicate key value violates unique constraint \"users_pkey\": Key (username)=({username}) already exists."
        )));
    }
    rows.push(User::new(username, name, city));
    Ok(1)
}

fn update_city(rows: &mut [User], update: &CityUpdate) -> Result<usize, DataAccessError> {
    let mut affected = 0;
    for row in rows.iter_mut().filter(|row| row.username() == update.username) {
        let city = update
            .city
            .as_deref()
            .ok_or_else(|| not_null_violation(UserField::City))?;
        *row = row.clone().with_city(city);
        affected += 1;
    }
    Ok(affected)
}

fn apply(rows: &mut Vec<User>, statement: &UserStatement) -> Result<usize, DataAccessError> {
    match statement {
        UserStatement::Insert(new_user) => insert_row(rows, new_user),
        UserStatement::UpdateCity(update) => update_city(rows, update),
    }
}

fn replay(rows: &mut Vec<User>, statements: &[UserStatement]) -> Result<(), DataAccessError> {
    for statement in statements {
        apply(rows, statement)?;
    }
    Ok(())
}

#[async_trait]
impl UserConnection for InMemoryConnection {
    async fn query(&mut self, query: UserQuery) -> Result<Vec<User>, DataAccessError> {
        self.ensure_open()?;
        self.check_fault(StoreOperation::Query)?;
        let rows = self.own_view()?;
        Ok(match query {
            UserQuery::All => rows,
            UserQuery::ByUsername(username) => rows
                .into_iter()
                .filter(|row| row.username() == username)
                .collect(),
        })
    }

    async fn execute(&mut self, statement: UserStatement) -> Result<usize, DataAccessError> {
        self.ensure_open()?;
        self.store.lock().executed += 1;
        self.check_fault(StoreOperation::Execute)?;
        let mut view = self.own_view()?;
        let affected = apply(&mut view, &statement)?;
        self.pending.push(statement);
        Ok(affected)
    }

    async fn commit(&mut self) -> Result<(), DataAccessError> {
        self.ensure_open()?;
        self.check_fault(StoreOperation::Commit)?;
        if self.pending.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.pending);
        let mut state = self.store.lock();
        let mut rows = state.rows.clone();
        replay(&mut rows, &pending)?;
        state.rows = rows;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DataAccessError> {
        self.ensure_open()?;
        self.check_fault(StoreOperation::Rollback)?;
        self.pending.clear();
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DataAccessError> {
        if self.closed {
            return Ok(());
        }
        if !self.pending.is_empty() {
            debug!(statements = self.pending.len(), "discarding uncommitted changes on close");
            self.pending.clear();
        }
        self.closed = true;
        let mut state = self.store.lock();
        state.closed += 1;
        match state.fault(StoreOperation::Close) {
            Some(message) => Err(DataAccessError::connection(message)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryUserStore {
        InMemoryUserStore::with_users([User::new("ssmith", "Sam Smith", "London")])
    }

    fn insert(username: Option<&str>, name: Option<&str>, city: &str) -> UserStatement {
        UserStatement::Insert(NewUser {
            username: username.map(str::to_owned),
            name: name.map(str::to_owned),
            city: Some(city.to_owned()),
        })
    }

    fn move_to(username: &str, city: Option<&str>) -> UserStatement {
        UserStatement::UpdateCity(CityUpdate {
            username: username.to_owned(),
            city: city.map(str::to_owned),
        })
    }

    fn usernames(store: &InMemoryUserStore) -> Vec<String> {
        store
            .users()
            .iter()
            .map(|user| user.username().to_owned())
            .collect()
    }

    #[rstest]
    #[tokio::test]
    async fn uncommitted_writes_are_invisible_to_other_connections(store: InMemoryUserStore) {
        let mut writer = store.acquire().await.expect("writer");
        let mut reader = store.acquire().await.expect("reader");

        writer
            .execute(insert(Some("ppopov"), Some("Peter Popov"), "London"))
            .await
            .expect("insert");

        assert_eq!(writer.query(UserQuery::All).await.expect("own view").len(), 2);
        assert_eq!(reader.query(UserQuery::All).await.expect("other view").len(), 1);

        writer.commit().await.expect("commit");
        assert_eq!(reader.query(UserQuery::All).await.expect("after commit").len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn rollback_discards_staged_rows(store: InMemoryUserStore) {
        let mut conn = store.acquire().await.expect("conn");
        conn.execute(insert(Some("ppopov"), Some("Peter Popov"), "London"))
            .await
            .expect("insert");

        conn.rollback().await.expect("rollback");
        conn.commit().await.expect("commit with nothing open");

        assert_eq!(store.users().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn close_discards_staged_rows_and_counts_once(store: InMemoryUserStore) {
        let mut conn = store.acquire().await.expect("conn");
        conn.execute(insert(Some("ppopov"), Some("Peter Popov"), "London"))
            .await
            .expect("insert");

        conn.close().await.expect("close");
        conn.close().await.expect("second close is a no-op");

        assert_eq!(store.users().len(), 1);
        assert_eq!(store.closed_count(), 1);
        assert_eq!(store.open_connections(), 0);
        assert!(conn.query(UserQuery::All).await.is_err());
    }

    #[rstest]
    #[case(None, Some("Peter Popov"), "username")]
    #[case(Some("ppopov"), None, "name")]
    #[tokio::test]
    async fn insert_rejects_null_columns(
        store: InMemoryUserStore,
        #[case] username: Option<&str>,
        #[case] name: Option<&str>,
        #[case] column: &str,
    ) {
        let mut conn = store.acquire().await.expect("conn");

        let err = conn
            .execute(insert(username, name, "London"))
            .await
            .expect_err("not-null violation");

        assert!(err.to_string().contains(&format!("\"{column}\"")));
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_duplicate_username(store: InMemoryUserStore) {
        let mut conn = store.acquire().await.expect("conn");

        let err = conn
            .execute(insert(Some("ssmith"), Some("Another Smith"), "Leeds"))
            .await
            .expect_err("unique violation");

        assert!(err.to_string().contains("users_pkey"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_reports_affected_rows(store: InMemoryUserStore) {
        let mut conn = store.acquire().await.expect("conn");

        let hit = conn
            .execute(move_to("ssmith", Some("Raleigh")))
            .await
            .expect("update");
        let miss = conn
            .execute(move_to("nobody", Some("Raleigh")))
            .await
            .expect("update");
        conn.commit().await.expect("commit");

        assert_eq!((hit, miss), (1, 0));
        assert_eq!(store.users()[0].city(), "Raleigh");
    }

    #[rstest]
    #[tokio::test]
    async fn injected_faults_surface_per_operation(store: InMemoryUserStore) {
        store.fail(StoreOperation::Acquire, "too many clients");
        assert!(store.acquire().await.is_err());
        store.clear_fault(StoreOperation::Acquire);

        store.fail(StoreOperation::Commit, "could not serialize access");
        let mut conn = store.acquire().await.expect("conn");
        conn.execute(insert(Some("ppopov"), Some("Peter Popov"), "London"))
            .await
            .expect("insert");

        let err = conn.commit().await.expect_err("commit fault");

        assert!(matches!(err, DataAccessError::Transaction { .. }));
        assert_eq!(store.users().len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn interleaved_commits_keep_both_writers_rows(store: InMemoryUserStore) {
        let mut first = store.acquire().await.expect("first");
        let mut second = store.acquire().await.expect("second");

        first
            .execute(insert(Some("alice"), Some("Alice Adams"), "Leeds"))
            .await
            .expect("first insert");
        second
            .execute(insert(Some("bob"), Some("Bob Brown"), "York"))
            .await
            .expect("second insert");
        second.commit().await.expect("second commit");
        first.commit().await.expect("first commit");

        assert_eq!(usernames(&store), ["ssmith", "bob", "alice"]);
    }

    #[rstest]
    #[tokio::test]
    async fn interleaved_updates_to_different_rows_both_land() {
        let store = InMemoryUserStore::with_users([
            User::new("ssmith", "Sam Smith", "London"),
            User::new("jdoe", "Jane Doe", "Paris"),
        ]);
        let mut first = store.acquire().await.expect("first");
        let mut second = store.acquire().await.expect("second");

        first.execute(move_to("ssmith", Some("Raleigh"))).await.expect("first update");
        second.execute(move_to("jdoe", Some("Berlin"))).await.expect("second update");
        first.commit().await.expect("first commit");
        second.commit().await.expect("second commit");

        assert_eq!(
            store.users(),
            vec![
                User::new("ssmith", "Sam Smith", "Raleigh"),
                User::new("jdoe", "Jane Doe", "Berlin"),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn insert_after_a_committed_duplicate_is_rejected(store: InMemoryUserStore) {
        let mut first = store.acquire().await.expect("first");
        let mut second = store.acquire().await.expect("second");

        first
            .execute(insert(Some("dup"), Some("First"), "Leeds"))
            .await
            .expect("first insert");
        first.commit().await.expect("first commit");
        let err = second
            .execute(insert(Some("dup"), Some("Second"), "York"))
            .await
            .expect_err("key already committed");

        assert!(err.to_string().contains("users_pkey"));
        assert_eq!(usernames(&store), ["ssmith", "dup"]);
    }

    #[rstest]
    #[tokio::test]
    async fn racing_duplicate_inserts_commit_exactly_one_row(store: InMemoryUserStore) {
        let mut first = store.acquire().await.expect("first");
        let mut second = store.acquire().await.expect("second");

        first
            .execute(insert(Some("dup"), Some("First"), "Leeds"))
            .await
            .expect("first insert");
        second
            .execute(insert(Some("dup"), Some("Second"), "York"))
            .await
            .expect("uncommitted rows are invisible");
        first.commit().await.expect("first commit");
        let err = second.commit().await.expect_err("duplicate at commit");
        second.close().await.expect("close");

        assert!(err.to_string().contains("users_pkey"));
        assert_eq!(
            store.users(),
            vec![
                User::new("ssmith", "Sam Smith", "London"),
                User::new("dup", "First", "Leeds"),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn null_city_violates_the_not_null_constraint(store: InMemoryUserStore) {
        let mut conn = store.acquire().await.expect("conn");

        let insert_err = conn
            .execute(UserStatement::Insert(NewUser {
                username: Some("ppopov".to_owned()),
                name: Some("Peter Popov".to_owned()),
                city: None,
            }))
            .await
            .expect_err("null city on insert");
        let update_err = conn
            .execute(move_to("ssmith", None))
            .await
            .expect_err("null city on update");
        let untouched = conn
            .execute(move_to("nobody", None))
            .await
            .expect("no row matches, so no row violates");

        assert!(insert_err.to_string().contains("\"city\""));
        assert!(update_err.to_string().contains("\"city\""));
        assert_eq!(untouched, 0);
        assert_eq!(store.users()[0].city(), "London");
    }
}
