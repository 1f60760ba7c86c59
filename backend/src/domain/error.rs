//! Error taxonomy of the users pipeline.
//!
//! Errors stay transport agnostic. The envelope maps each category to a
//! [`StatusKind`]; inbound adapters map that to their own protocol.

use super::envelope::StatusKind;
use super::ports::DataAccessError;
use super::validation::ValidationError;

/// Any failure a users operation can report.
///
/// The display text is the underlying message, which becomes the envelope's
/// `errors` field verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsersError {
    /// Caller input failed presence checks; no data access was attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The store reported a fault after validation passed.
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

impl UsersError {
    /// Status category for this error.
    pub fn status(&self) -> StatusKind {
        match self {
            Self::Validation(_) => StatusKind::ApiError,
            Self::DataAccess(_) => StatusKind::InternalError,
        }
    }
}

impl From<&UsersError> for StatusKind {
    fn from(value: &UsersError) -> Self {
        value.status()
    }
}
