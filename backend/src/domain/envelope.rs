//! Uniform response envelope and status taxonomy.
//!
//! Every users operation answers with exactly one [`Envelope`]. On success it
//! carries `results`; on failure it carries `errors`. Never both.
//!
//! ```text
//! {"status": 200, "results": [...]}
//! {"status": 400, "errors": "missing required field: city"}
//! ```

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::error::UsersError;
use super::user::User;

/// Outcome category carried in the envelope's `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u16")]
pub enum StatusKind {
    /// Operation completed and its side effects, if any, were committed.
    Success,
    /// Caller input failed validation before any data access.
    ApiError,
    /// A data-access operation failed after validation passed.
    InternalError,
}

impl StatusKind {
    /// Numeric code written to the wire.
    pub const fn code(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::ApiError => 400,
            Self::InternalError => 500,
        }
    }

    /// Symbolic name of the category.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::ApiError => "API_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl From<StatusKind> for u16 {
    fn from(value: StatusKind) -> Self {
        value.code()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Outcome<T> {
    Results(T),
    Errors(String),
}

/// Response envelope returned by every users operation.
///
/// # Examples
/// ```
/// use users_backend::domain::{Envelope, StatusKind};
///
/// let envelope = Envelope::success("user inserted successfully".to_owned());
/// assert_eq!(envelope.status(), StatusKind::Success);
/// assert_eq!(
///     serde_json::to_value(&envelope).unwrap(),
///     serde_json::json!({"status": 200, "results": "user inserted successfully"})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    status: StatusKind,
    #[serde(flatten)]
    outcome: Outcome<T>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `results`.
    pub fn success(results: T) -> Self {
        Self {
            status: StatusKind::Success,
            outcome: Outcome::Results(results),
        }
    }

    /// Failure envelope whose status is derived from the error category.
    pub fn failure(error: &UsersError) -> Self {
        Self {
            status: error.status(),
            outcome: Outcome::Errors(error.to_string()),
        }
    }

    /// Build the envelope for an operation outcome.
    pub fn from_result(result: Result<T, UsersError>) -> Self {
        match result {
            Ok(results) => Self::success(results),
            Err(error) => Self::failure(&error),
        }
    }

    /// Status category of the envelope.
    pub fn status(&self) -> StatusKind {
        self.status
    }

    /// Payload on success.
    pub fn results(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Results(results) => Some(results),
            Outcome::Errors(_) => None,
        }
    }

    /// Error message on failure.
    pub fn errors(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Results(_) => None,
            Outcome::Errors(message) => Some(message.as_str()),
        }
    }

    /// Consume the envelope, returning the payload on success.
    pub fn into_results(self) -> Option<T> {
        match self.outcome {
            Outcome::Results(results) => Some(results),
            Outcome::Errors(_) => None,
        }
    }
}

/// Result of a lookup by username.
///
/// A miss is not an error: it serialises as an empty mapping `{}` so the
/// envelope still reports success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserLookup(Option<User>);

impl UserLookup {
    /// Lookup that matched `user`.
    pub fn found(user: User) -> Self {
        Self(Some(user))
    }

    /// Lookup that matched no row.
    pub fn missing() -> Self {
        Self(None)
    }

    /// Matched user, if any.
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

impl From<Option<User>> for UserLookup {
    fn from(value: Option<User>) -> Self {
        Self(value)
    }
}

impl Serialize for UserLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(user) => user.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DataAccessError;
    use crate::domain::{UserField, ValidationError};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn to_json<T: Serialize>(envelope: &Envelope<T>) -> Value {
        serde_json::to_value(envelope).expect("serialise envelope")
    }

    #[rstest]
    #[case(StatusKind::Success, 200, "SUCCESS")]
    #[case(StatusKind::ApiError, 400, "API_ERROR")]
    #[case(StatusKind::InternalError, 500, "INTERNAL_ERROR")]
    fn status_kinds_carry_code_and_name(
        #[case] kind: StatusKind,
        #[case] code: u16,
        #[case] name: &str,
    ) {
        assert_eq!(kind.code(), code);
        assert_eq!(kind.name(), name);
    }

    #[rstest]
    fn success_populates_results_only() {
        let envelope = Envelope::success(vec![User::new("ppopov", "Peter Popov", "London")]);
        let value = to_json(&envelope);

        assert_eq!(
            value,
            json!({
                "status": 200,
                "results": [{"username": "ppopov", "name": "Peter Popov", "city": "London"}]
            })
        );
        assert!(envelope.errors().is_none());
    }

    #[rstest]
    fn validation_failure_populates_errors_only() {
        let error = UsersError::from(ValidationError::missing_field(UserField::City));
        let envelope = Envelope::<String>::failure(&error);

        assert_eq!(
            to_json(&envelope),
            json!({"status": 400, "errors": "missing required field: city"})
        );
        assert!(envelope.results().is_none());
    }

    #[rstest]
    fn data_access_failure_maps_to_internal_error() {
        let error = UsersError::from(DataAccessError::query("relation \"users\" does not exist"));
        let envelope = Envelope::<Vec<User>>::from_result(Err(error));

        assert_eq!(envelope.status(), StatusKind::InternalError);
        assert_eq!(envelope.errors(), Some("relation \"users\" does not exist"));
    }

    #[rstest]
    fn lookup_miss_serialises_as_empty_mapping() {
        let envelope = Envelope::success(UserLookup::missing());
        assert_eq!(to_json(&envelope), json!({"status": 200, "results": {}}));
    }

    #[rstest]
    fn lookup_hit_serialises_as_user_mapping() {
        let envelope = Envelope::success(UserLookup::found(User::new(
            "ppopov",
            "Peter Popov",
            "London",
        )));
        assert_eq!(
            to_json(&envelope),
            json!({
                "status": 200,
                "results": {"username": "ppopov", "name": "Peter Popov", "city": "London"}
            })
        );
    }

    #[rstest]
    fn empty_list_is_a_success() {
        let envelope = Envelope::success(Vec::<User>::new());
        assert_eq!(to_json(&envelope), json!({"status": 200, "results": []}));
    }
}
