//! HTTP mapping for response envelopes.
//!
//! The response status mirrors the envelope's `status` field. Bodies that fail
//! to deserialise are answered with an `API_ERROR` envelope instead of Actix's
//! plain-text rejection.

use actix_web::body::BoxBody;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Serialize;
use tracing::warn;

use crate::domain::{Envelope, StatusKind, UsersError, ValidationError};

/// HTTP status matching an envelope status.
pub fn status_code(status: StatusKind) -> StatusCode {
    match status {
        StatusKind::Success => StatusCode::OK,
        StatusKind::ApiError => StatusCode::BAD_REQUEST,
        StatusKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T: Serialize> Responder for Envelope<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::build(status_code(self.status())).json(&self)
    }
}

/// JSON extractor configuration for the users endpoints.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_backend::inbound::http::envelope::json_config;
///
/// let _app = App::new().app_data(json_config());
/// ```
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        warn!(path = %req.path(), error = %err, "rejected request body");
        let rejection = UsersError::from(ValidationError::malformed_payload(err.to_string()));
        let response = HttpResponse::BadRequest().json(Envelope::<()>::failure(&rejection));
        InternalError::from_response(err, response).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DataAccessError;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(StatusKind::Success, StatusCode::OK)]
    #[case(StatusKind::ApiError, StatusCode::BAD_REQUEST)]
    #[case(StatusKind::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_mirrors_envelope(#[case] status: StatusKind, #[case] expected: StatusCode) {
        assert_eq!(status_code(status), expected);
        assert_eq!(expected.as_u16(), status.code());
    }

    #[actix_web::test]
    async fn failure_envelope_sets_response_status() {
        let app = actix_test::init_service(App::new().route(
            "/",
            web::get().to(|| async {
                Envelope::<String>::failure(&UsersError::from(DataAccessError::query("boom")))
            }),
        ))
        .await;

        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!({"status": 500, "errors": "boom"}));
    }

    #[actix_web::test]
    async fn malformed_json_becomes_api_error_envelope() {
        let app = actix_test::init_service(App::new().app_data(json_config()).route(
            "/",
            web::post().to(|body: web::Json<Value>| async move { body.to_string() }),
        ))
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();

        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["status"], json!(400));
        assert!(
            body["errors"]
                .as_str()
                .is_some_and(|message| message.starts_with("malformed payload:"))
        );
        assert!(body.get("results").is_none());
    }
}
