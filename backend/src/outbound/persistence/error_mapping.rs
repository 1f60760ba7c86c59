//! Mapping from pool and Diesel failures to [`DataAccessError`].
//!
//! The database's own message is kept: it becomes the `errors` text of an
//! internal-error envelope.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::DataAccessError;

use super::pool::PoolError;

/// Map pool errors to connection failures.
pub(super) fn map_pool_error(error: PoolError) -> DataAccessError {
    debug!(%error, "connection checkout failed");
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DataAccessError::connection(message)
        }
    }
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

/// Map Diesel errors raised by a statement.
pub(super) fn map_diesel_error(error: DieselError) -> DataAccessError {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            DataAccessError::connection(info.message())
        }
        DieselError::DatabaseError(_, info) => DataAccessError::query(info.message()),
        other => DataAccessError::query(other.to_string()),
    }
}

/// Map Diesel errors raised while beginning or ending a transaction.
pub(super) fn map_transaction_error(error: DieselError) -> DataAccessError {
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            DataAccessError::connection(info.message())
        }
        DieselError::DatabaseError(_, info) => DataAccessError::transaction(info.message()),
        other => DataAccessError::transaction(other.to_string()),
    }
}
