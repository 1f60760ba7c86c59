//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Columns of the users table, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    /// Unique, immutable key of a user row.
    Username,
    /// Free-text full name.
    Name,
    /// Free-text city; the only column an update may change.
    City,
}

impl UserField {
    /// Wire and column name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Name => "name",
            Self::City => "city",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the users table.
///
/// Serialises as `{"username": ..., "name": ..., "city": ...}`, which is the
/// per-user mapping returned by the list and lookup endpoints.
///
/// # Examples
/// ```
/// use users_backend::domain::User;
///
/// let user = User::new("ppopov", "Peter Popov", "London");
/// assert_eq!(user.username(), "ppopov");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    name: String,
    city: String,
}

impl User {
    /// Build a user from its three columns.
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            city: city.into(),
        }
    }

    /// Unique key of the row.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Full name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// City of residence.
    pub fn city(&self) -> &str {
        self.city.as_str()
    }

    /// Replace the city, keeping every other column.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn serialises_columns_by_name() {
        let user = User::new("ppopov", "Peter Popov", "London");
        let value = serde_json::to_value(&user).expect("serialise user");
        assert_eq!(
            value,
            json!({"username": "ppopov", "name": "Peter Popov", "city": "London"})
        );
    }

    #[rstest]
    fn with_city_leaves_name_untouched() {
        let user = User::new("ssmith", "Sam Smith", "London").with_city("Raleigh");
        assert_eq!(user.city(), "Raleigh");
        assert_eq!(user.name(), "Sam Smith");
        assert_eq!(user.username(), "ssmith");
    }

    #[rstest]
    #[case(UserField::Username, "username")]
    #[case(UserField::Name, "name")]
    #[case(UserField::City, "city")]
    fn field_names_match_columns(#[case] field: UserField, #[case] expected: &str) {
        assert_eq!(field.to_string(), expected);
    }
}
