//! Users API handlers.
//!
//! ```text
//! GET /users/
//! GET /users/ppopov
//! POST /users/ {"username":"ppopov","name":"Peter Popov","city":"London"}
//! PUT /users/ppopov {"city":"Raleigh"}
//! ```
//!
//! Every handler answers with an envelope whose status also sets the HTTP
//! status.

use actix_web::{HttpResponse, get, http::header::ContentType, post, put, web};

use crate::domain::{CreateUserPayload, Envelope, UpdateCityPayload, User, UserLookup};

use super::schemas::{
    CreateUserPayloadSchema, ErrorEnvelopeSchema, MessageEnvelopeSchema, UpdateCityPayloadSchema,
    UserEnvelopeSchema, UserListEnvelopeSchema,
};
use super::state::HttpState;

const LANDING_PAGE: &str = "<!doctype html>
<html>
<head><title>Users API</title></head>
<body>
<p>Hello World!</p>
<ul>
<li><code>GET /users/</code> lists every user</li>
<li><code>GET /users/{username}</code> fetches one user</li>
<li><code>POST /users/</code> creates a user</li>
<li><code>PUT /users/{username}</code> updates a user's city</li>
</ul>
</body>
</html>
";

/// Landing page listing the available endpoints.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Landing page", content_type = "text/html")),
    tags = ["users"],
    operation_id = "landingPage"
)]
#[get("/")]
pub async fn landing_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(LANDING_PAGE)
}

/// List every user in storage order.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users/",
    responses(
        (status = 200, description = "Users", body = UserListEnvelopeSchema),
        (status = 500, description = "Storage failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users/")]
pub async fn list_users(state: web::Data<HttpState>) -> Envelope<Vec<User>> {
    state.users.list_users().await
}

/// Fetch one user by username; a miss yields an empty mapping.
#[utoipa::path(
    get,
    path = "/users/{username}",
    params(("username" = String, Path, description = "Key of the user")),
    responses(
        (status = 200, description = "User, or `{}` when absent", body = UserEnvelopeSchema),
        (status = 500, description = "Storage failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{username}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    username: web::Path<String>,
) -> Envelope<UserLookup> {
    state.users.get_user(username.as_str()).await
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = CreateUserPayloadSchema,
    responses(
        (status = 200, description = "User inserted", body = MessageEnvelopeSchema),
        (status = 400, description = "Missing city or malformed body", body = ErrorEnvelopeSchema),
        (status = 500, description = "Storage failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserPayload>,
) -> Envelope<String> {
    state.users.create_user(payload.into_inner()).await
}

/// Replace the city of a user.
#[utoipa::path(
    put,
    path = "/users/{username}",
    params(("username" = String, Path, description = "Key of the user")),
    request_body = UpdateCityPayloadSchema,
    responses(
        (status = 200, description = "User updated", body = MessageEnvelopeSchema),
        (status = 400, description = "Missing city or malformed body", body = ErrorEnvelopeSchema),
        (status = 500, description = "Storage failure", body = ErrorEnvelopeSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{username}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    username: web::Path<String>,
    payload: web::Json<UpdateCityPayload>,
) -> Envelope<String> {
    state
        .users
        .update_user(username.as_str(), payload.into_inner())
        .await
}
