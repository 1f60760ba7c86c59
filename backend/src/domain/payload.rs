//! Inbound payload records and the validated commands built from them.
//!
//! Each write operation owns one record type with every field optional, so a
//! body with missing keys still deserialises and the validation layer decides
//! what is required. Unknown keys are ignored.
//!
//! `city` keeps an absent key apart from an explicit `null`: the outer
//! `Option` records presence, the inner one the value. A present `null` passes
//! validation and reaches storage as `NULL`.

use serde::{Deserialize, Deserializer, Serialize};

use super::user::UserField;
use super::validation::{RequiredFields, ValidationError, validate};

/// Body of `POST /users/`.
///
/// Only `city` is required. `username` and `name` are forwarded as supplied
/// and left for the storage layer to reject when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CreateUserPayload {
    /// Key of the new row.
    pub username: Option<String>,
    /// Full name.
    pub name: Option<String>,
    /// City of residence. `Some(None)` is an explicit `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<Option<String>>,
}

impl RequiredFields for CreateUserPayload {
    const REQUIRED: &'static [UserField] = &[UserField::City];

    fn has_field(&self, field: UserField) -> bool {
        match field {
            UserField::Username => self.username.is_some(),
            UserField::Name => self.name.is_some(),
            UserField::City => self.city.is_some(),
        }
    }
}

/// Body of `PUT /users/{username}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpdateCityPayload {
    /// Replacement city. `Some(None)` is an explicit `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub city: Option<Option<String>>,
}

impl RequiredFields for UpdateCityPayload {
    const REQUIRED: &'static [UserField] = &[UserField::City];

    fn has_field(&self, field: UserField) -> bool {
        match field {
            UserField::City => self.city.is_some(),
            UserField::Username | UserField::Name => false,
        }
    }
}

/// Mark a key as present whatever its value, `null` included.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Validated insert command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Key of the new row; `None` when the caller omitted it.
    pub username: Option<String>,
    /// Full name; `None` when the caller omitted it.
    pub name: Option<String>,
    /// City of residence; `None` when the caller sent `null`.
    pub city: Option<String>,
}

impl TryFrom<CreateUserPayload> for NewUser {
    type Error = ValidationError;

    fn try_from(payload: CreateUserPayload) -> Result<Self, Self::Error> {
        validate(&payload)?;
        let CreateUserPayload {
            username,
            name,
            city,
        } = payload;
        let Some(city) = city else {
            return Err(ValidationError::missing_field(UserField::City));
        };
        Ok(Self {
            username,
            name,
            city,
        })
    }
}

/// Validated update command: set `city` on the row keyed by `username`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityUpdate {
    /// Key of the row to update.
    pub username: String,
    /// Replacement city; `None` when the caller sent `null`.
    pub city: Option<String>,
}

impl CityUpdate {
    /// Validate `payload` and pair it with the path key.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingField`] when the `city` key is absent.
    pub fn try_from_parts(
        username: impl Into<String>,
        payload: UpdateCityPayload,
    ) -> Result<Self, ValidationError> {
        validate(&payload)?;
        let Some(city) = payload.city else {
            return Err(ValidationError::missing_field(UserField::City));
        };
        Ok(Self {
            username: username.into(),
            city,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn create_payload_ignores_unknown_keys() {
        let payload: CreateUserPayload =
            serde_json::from_str(r#"{"username":"ppopov","city":"London","extra":1}"#)
                .expect("payload");

        assert_eq!(payload.username.as_deref(), Some("ppopov"));
        assert_eq!(payload.city, Some(Some("London".to_owned())));
    }

    #[rstest]
    #[case::absent(r#"{"username":"ppopov"}"#, None)]
    #[case::null(r#"{"username":"ppopov","city":null}"#, Some(None))]
    fn create_payload_keeps_absent_apart_from_null(
        #[case] body: &str,
        #[case] expected: Option<Option<String>>,
    ) {
        let payload: CreateUserPayload = serde_json::from_str(body).expect("payload");
        assert_eq!(payload.city, expected);
    }

    #[rstest]
    fn explicit_null_city_is_forwarded_to_storage() {
        let payload: CreateUserPayload =
            serde_json::from_str(r#"{"username":"ppopov","name":"Peter Popov","city":null}"#)
                .expect("payload");

        let new_user = NewUser::try_from(payload).expect("null city is present");

        assert_eq!(new_user.city, None);
        assert_eq!(new_user.username.as_deref(), Some("ppopov"));
    }

    #[rstest]
    fn absent_city_is_missing() {
        let payload: CreateUserPayload =
            serde_json::from_str(r#"{"username":"ppopov"}"#).expect("payload");
        assert_eq!(
            NewUser::try_from(payload),
            Err(ValidationError::missing_field(UserField::City))
        );
    }

    #[rstest]
    fn create_payload_only_requires_city() {
        let payload = CreateUserPayload {
            city: Some(Some("London".to_owned())),
            ..CreateUserPayload::default()
        };

        let new_user = NewUser::try_from(payload).expect("city alone passes validation");

        assert_eq!(new_user.city.as_deref(), Some("London"));
        assert!(new_user.username.is_none());
        assert!(new_user.name.is_none());
    }

    #[rstest]
    fn city_update_requires_city_key() {
        let err = CityUpdate::try_from_parts("ssmith", UpdateCityPayload::default())
            .expect_err("missing city");
        assert_eq!(err, ValidationError::missing_field(UserField::City));
    }

    #[rstest]
    fn city_update_accepts_explicit_null() {
        let payload: UpdateCityPayload =
            serde_json::from_str(r#"{"city":null}"#).expect("payload");

        let update = CityUpdate::try_from_parts("ssmith", payload).expect("null city is present");

        assert_eq!(update.city, None);
    }

    #[rstest]
    fn city_update_keeps_path_key() {
        let update = CityUpdate::try_from_parts(
            "ssmith",
            UpdateCityPayload {
                city: Some(Some("Raleigh".to_owned())),
            },
        )
        .expect("valid update");

        assert_eq!(
            update,
            CityUpdate {
                username: "ssmith".to_owned(),
                city: Some("Raleigh".to_owned()),
            }
        );
    }
}
