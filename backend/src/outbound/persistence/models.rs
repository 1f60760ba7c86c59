//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use crate::domain::{NewUser, User};

use super::schema::users;

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub username: String,
    pub name: String,
    pub city: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::new(row.username, row.name, row.city)
    }
}

/// Insertable struct for creating user records.
///
/// `None` columns are written as `DEFAULT`, which the schema rejects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: Option<&'a str>,
    pub name: Option<&'a str>,
    pub city: Option<&'a str>,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(new_user: &'a NewUser) -> Self {
        Self {
            username: new_user.username.as_deref(),
            name: new_user.name.as_deref(),
            city: new_user.city.as_deref(),
        }
    }
}
