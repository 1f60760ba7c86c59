//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror the wire shape of envelopes and payloads and live in
//! the inbound adapter layer where framework concerns belong.

#![expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = User)]
pub struct UserSchema {
    /// Unique key of the user.
    #[schema(example = "ppopov")]
    username: String,
    /// Full name.
    #[schema(example = "Peter Popov")]
    name: String,
    /// City of residence.
    #[schema(example = "London")]
    city: String,
}

/// OpenAPI schema for [`crate::domain::CreateUserPayload`].
///
/// Only `city` is checked for presence.
#[derive(ToSchema)]
#[schema(as = CreateUserPayload)]
pub struct CreateUserPayloadSchema {
    #[schema(example = "ppopov")]
    username: Option<String>,
    #[schema(example = "Peter Popov")]
    name: Option<String>,
    #[schema(example = "London")]
    city: String,
}

/// OpenAPI schema for [`crate::domain::UpdateCityPayload`].
#[derive(ToSchema)]
#[schema(as = UpdateCityPayload)]
pub struct UpdateCityPayloadSchema {
    #[schema(example = "Raleigh")]
    city: String,
}

/// Successful envelope carrying every user.
#[derive(ToSchema)]
#[schema(as = UserListEnvelope)]
pub struct UserListEnvelopeSchema {
    #[schema(example = 200)]
    status: u16,
    results: Vec<UserSchema>,
}

/// Successful envelope carrying one user, or `{}` when none matched.
#[derive(ToSchema)]
#[schema(as = UserEnvelope)]
pub struct UserEnvelopeSchema {
    #[schema(example = 200)]
    status: u16,
    results: UserSchema,
}

/// Successful envelope carrying a confirmation message.
#[derive(ToSchema)]
#[schema(as = MessageEnvelope)]
pub struct MessageEnvelopeSchema {
    #[schema(example = 200)]
    status: u16,
    #[schema(example = "user inserted successfully")]
    results: String,
}

/// Failure envelope; `status` is 400 for rejected input and 500 for storage faults.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
pub struct ErrorEnvelopeSchema {
    #[schema(example = 400)]
    status: u16,
    #[schema(example = "missing required field: city")]
    errors: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Property names in sorted order.
    fn properties<S: PartialSchema>() -> Vec<String> {
        match S::schema() {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn user_schema_matches_wire_fields() {
        assert_eq!(properties::<UserSchema>(), ["city", "name", "username"]);
    }

    #[test]
    fn error_envelope_never_carries_results() {
        assert_eq!(properties::<ErrorEnvelopeSchema>(), ["errors", "status"]);
    }
}
