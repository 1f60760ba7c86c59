//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. When the migrations
//! change, regenerate with `diesel print-schema` or update by hand.

diesel::table! {
    /// Registered users keyed by username.
    users (username) {
        /// Primary key.
        username -> Varchar,
        /// Full name.
        name -> Varchar,
        /// City of residence.
        city -> Varchar,
    }
}
