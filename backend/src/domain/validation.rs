//! Structural validation of inbound payload records.
//!
//! Validation only checks presence: a required field is missing when its key
//! is absent. A key sent as JSON `null` is present, and the storage layer
//! decides whether it accepts the value. Types and business rules are not
//! inspected. The first missing field, in the record's declaration order, is
//! reported.

use super::user::UserField;

/// Validation failures raised before any data access takes place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was absent from the payload.
    #[error("missing required field: {field}")]
    MissingField {
        /// The first required field found missing.
        field: UserField,
    },
    /// The request body could not be read as the expected record.
    #[error("malformed payload: {message}")]
    MalformedPayload {
        /// Deserialiser diagnostic.
        message: String,
    },
}

impl ValidationError {
    /// Convenience constructor for [`ValidationError::MissingField`].
    pub fn missing_field(field: UserField) -> Self {
        Self::MissingField { field }
    }

    /// Convenience constructor for [`ValidationError::MalformedPayload`].
    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            message: message.into(),
        }
    }
}

/// A payload record that declares which of its fields must be present.
pub trait RequiredFields {
    /// Required fields, in the order they are checked.
    const REQUIRED: &'static [UserField];

    /// Whether the payload carried a key for `field`.
    fn has_field(&self, field: UserField) -> bool;
}

/// Check every required field of `payload` is present.
///
/// # Examples
/// ```
/// use users_backend::domain::{validate, CreateUserPayload, UserField, ValidationError};
///
/// let payload = CreateUserPayload::default();
/// assert_eq!(
///     validate(&payload),
///     Err(ValidationError::missing_field(UserField::City))
/// );
/// ```
pub fn validate<P: RequiredFields>(payload: &P) -> Result<(), ValidationError> {
    match P::REQUIRED
        .iter()
        .copied()
        .find(|field| !payload.has_field(*field))
    {
        Some(field) => Err(ValidationError::missing_field(field)),
        None => Ok(()),
    }
}
