//! Tests for error construction, trace capture and wire shape.

use super::*;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> TraceId {
    TraceId::from_header(TRACE_ID).expect("fixture trace id is a UUID")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::invalid_id("Invalid Id"), ErrorCode::InvalidId)]
#[case(Error::unauthorized("nope"), ErrorCode::Unauthorized)]
#[case(Error::not_found("gone"), ErrorCode::NotFound)]
#[case(Error::upload_failed("host down"), ErrorCode::UploadFailed)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::NotFound, "  ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::not_found("gone").try_with_trace_id(" ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
#[tokio::test]
async fn constructors_capture_scoped_trace_id(trace_id: TraceId) {
    let error = TraceId::scope(trace_id, async { Error::unauthorized("nope") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serializes_message_under_error_key() {
    let error = Error::invalid_request("rating is required")
        .with_details(json!({ "field": "rating" }))
        .with_trace_id(TRACE_ID);

    let value = serde_json::to_value(&error).expect("error serializes");
    assert_eq!(
        value,
        json!({
            "error": "rating is required",
            "code": "invalid_request",
            "details": { "field": "rating" },
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::not_found("Review not found")).expect("serializes");
    assert_eq!(value, json!({ "error": "Review not found", "code": "not_found" }));
}

#[rstest]
#[tokio::test]
async fn deserializing_ignores_ambient_trace(trace_id: TraceId) {
    let payload = json!({ "error": "gone", "code": "not_found" });
    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("payload deserializes")
    })
    .await;
    assert!(error.trace_id().is_none());
}

#[rstest]
fn deserializing_rejects_blank_messages() {
    let payload = json!({ "error": "", "code": "not_found" });
    assert!(serde_json::from_value::<Error>(payload).is_err());
}

#[given("a blank message")]
fn a_blank_message() -> &'static str {
    "   "
}

#[when("an error is built from it")]
fn an_error_is_built_from_it(message: &str) -> Result<Error, ErrorValidationError> {
    Error::try_new(ErrorCode::InternalError, message)
}

#[then("construction is refused")]
fn construction_is_refused(result: Result<Error, ErrorValidationError>) {
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn blank_messages_are_refused() {
    let message = a_blank_message();
    let result = an_error_is_built_from_it(message);
    construction_is_refused(result);
}
