//! Status mapping and redaction of the error envelope.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> String {
    TRACE_ID.to_owned()
}

async fn render(error: &Error) -> (StatusCode, Option<String>, Error) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("ascii header").to_owned());
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let payload = serde_json::from_slice(&bytes).expect("error envelope");
    (status, header, payload)
}

#[rstest]
#[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::Unauthorized, StatusCode::UNAUTHORIZED)]
#[case(ErrorCode::Forbidden, StatusCode::FORBIDDEN)]
#[case(ErrorCode::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorCode::Conflict, StatusCode::CONFLICT)]
#[case(ErrorCode::ServiceUnavailable, StatusCode::SERVICE_UNAVAILABLE)]
#[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
fn codes_map_to_statuses(#[case] code: ErrorCode, #[case] status: StatusCode) {
    assert_eq!(status_for(code), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(trace_id: String) {
    let error = Error::internal("Error creating account: disk full")
        .with_trace_id(trace_id.clone())
        .with_details(json!({"table": "identities"}));

    let (status, header, payload) = render(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(trace_id.as_str()));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn conflicts_keep_their_details(trace_id: String) {
    let error = Error::conflict("Username already exists")
        .with_trace_id(trace_id)
        .with_details(json!({"field": "username", "code": "duplicate_username"}));

    let (status, header, payload) = render(&error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(payload.message(), "Username already exists");
    assert_eq!(
        payload.details(),
        Some(&json!({"field": "username", "code": "duplicate_username"}))
    );
}

#[rstest]
#[actix_web::test]
async fn missing_trace_ids_omit_the_header() {
    let error = Error::unauthorized("Invalid username or password");

    let (status, header, payload) = render(&error).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(header.is_none());
    assert_eq!(payload.trace_id(), None);
}

#[rstest]
fn framework_errors_become_generic_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert!(err.details().is_none());
}
