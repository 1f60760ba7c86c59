//! Domain primitives, ports, and the users pipeline.
//!
//! Purpose: define the user entity, the typed payload records and their
//! validation, the response envelope, and the service that turns one request
//! into one statement against a connection from [`ports::ConnectionProvider`].
//!
//! Public surface:
//! - `User` / `UserField` — the users table row and its columns.
//! - `CreateUserPayload` / `UpdateCityPayload` — inbound records.
//! - `Envelope` / `StatusKind` / `UserLookup` — the uniform response.
//! - `UsersError` / `ValidationError` — failure taxonomy.
//! - `UsersService` — list, lookup, create, and update handlers.

pub mod envelope;
pub mod error;
pub mod payload;
pub mod ports;
pub mod user;
pub mod users_service;
pub mod validation;

pub use self::envelope::{Envelope, StatusKind, UserLookup};
pub use self::error::UsersError;
pub use self::payload::{CityUpdate, CreateUserPayload, NewUser, UpdateCityPayload};
pub use self::user::{User, UserField};
pub use self::users_service::{USER_INSERTED, USER_UPDATED, UsersService};
pub use self::validation::{RequiredFields, ValidationError, validate};
