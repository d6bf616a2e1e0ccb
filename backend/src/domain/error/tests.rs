//! Tests for domain error construction and serde round-trips.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
#[case(ErrorCode::NotFound, "not found")]
#[case(ErrorCode::InternalError, "Internal server error")]
fn new_falls_back_to_the_code_message(#[case] code: ErrorCode, #[case] expected: &str) {
    assert_eq!(Error::new(code, " ").message(), expected);
}

#[rstest]
fn redaction_hides_internal_detail_but_keeps_the_trace() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = Error::internal("pool exhausted at 10.0.0.4")
        .with_trace_id(trace_id)
        .for_field("db", "down");

    let redacted = error.redacted();

    assert_eq!(redacted.message(), "Internal server error");
    assert_eq!(redacted.details(), None);
    assert_eq!(redacted.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn redaction_keeps_client_errors_intact(base_error: Error) {
    let error = base_error.for_field("name", "required");
    assert_eq!(error.redacted(), error);
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn for_field_sets_field_details(base_error: Error) {
    let error = base_error.for_field("username", "reserved_username");
    assert_eq!(error.field(), Some("username"));
    assert_eq!(
        error.details(),
        Some(&json!({ "field": "username", "code": "reserved_username" }))
    );
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields(base_error: Error) {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let value = serde_json::to_value(base_error.with_trace_id(trace_id)).expect("serialise");
    assert_eq!(
        value,
        json!({ "code": "invalid_request", "message": "bad", "traceId": TRACE_ID })
    );
}

#[rstest]
#[case(json!({ "code": "not_found", "message": " " }))]
#[case(json!({ "code": "not_found", "message": "gone", "traceId": "" }))]
fn deserialisation_rejects_blank_fields(#[case] payload: serde_json::Value) {
    assert!(serde_json::from_value::<Error>(payload).is_err());
}

#[rstest]
#[tokio::test]
async fn deserialisation_ignores_ambient_trace_id() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let payload = json!({ "code": "conflict", "message": "taken" });
    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("valid payload")
    })
    .await;
    assert!(error.trace_id().is_none());
    assert_eq!(error.code(), ErrorCode::Conflict);
}
