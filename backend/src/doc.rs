//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: the users and health endpoints from the inbound layer
//! - **Schemas**: envelope and payload wrappers that describe the wire shape
//!   without coupling domain types to the utoipa framework
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{
    CreateUserPayloadSchema, ErrorEnvelopeSchema, MessageEnvelopeSchema, UpdateCityPayloadSchema,
    UserEnvelopeSchema, UserListEnvelopeSchema, UserSchema,
};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        description = "CRUD access to the users table with uniform status envelopes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::landing_page,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        CreateUserPayloadSchema,
        UpdateCityPayloadSchema,
        UserListEnvelopeSchema,
        UserEnvelopeSchema,
        MessageEnvelopeSchema,
        ErrorEnvelopeSchema
    )),
    tags(
        (name = "users", description = "Operations on the users table"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
