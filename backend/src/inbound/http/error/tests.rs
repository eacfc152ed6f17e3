//! Tests for HTTP error mapping.

use super::*;
use crate::domain::ports::RepositoryError;
use crate::domain::{ActivityId, ExpenseId, TagId, ValidationError};
use actix_web::body::to_bytes;
use rstest::rstest;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::unprocessable("in use"), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

#[rstest]
#[case(LifelogError::TagNotFound(TagId::new(1)), Group::Tags, StatusCode::NOT_FOUND)]
#[case(LifelogError::TagNotFound(TagId::new(1)), Group::Activities, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(LifelogError::TagNotFound(TagId::new(1)), Group::Expenses, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(LifelogError::ActivityNotFound(ActivityId::new(2)), Group::Activities, StatusCode::NOT_FOUND)]
#[case(LifelogError::ActivityNotFound(ActivityId::new(2)), Group::Expenses, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(LifelogError::ExpenseNotFound(ExpenseId::new(3)), Group::Expenses, StatusCode::NOT_FOUND)]
fn not_found_depends_on_the_group(
    #[case] err: LifelogError,
    #[case] group: Group,
    #[case] status: StatusCode,
) {
    assert_eq!(map_service_error(err, group).status_code(), status);
}

#[rstest]
#[case(LifelogError::Validation(ValidationError::TimeInFuture), StatusCode::BAD_REQUEST)]
#[case(LifelogError::PasswordLength, StatusCode::BAD_REQUEST)]
#[case(LifelogError::IncorrectCredentials, StatusCode::UNAUTHORIZED)]
#[case(LifelogError::DuplicateTagName("walk".into()), StatusCode::CONFLICT)]
#[case(LifelogError::TagHasExpenses(TagId::new(1)), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(LifelogError::TagHasActivities(TagId::new(1)), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(LifelogError::ActivityHasExpenses(ActivityId::new(1)), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(LifelogError::InvalidToken("expired".into()), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(LifelogError::HashNotFound, StatusCode::INTERNAL_SERVER_ERROR)]
#[case(LifelogError::Token("no secret".into()), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    LifelogError::Repository(RepositoryError::query("boom")),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn group_independent_mappings(#[case] err: LifelogError, #[case] status: StatusCode) {
    assert_eq!(map_service_error(err, Group::Tags).status_code(), status);
}

#[rstest]
fn message_is_the_plain_error_text() {
    let error = map_service_error(LifelogError::TagHasExpenses(TagId::new(4)), Group::Tags);
    assert_eq!(error.message(), "tag 4 is still used by expenses");
}

async fn body_of(error: &Error) -> (HttpResponse<()>, serde_json::Value) {
    let response = ResponseError::error_response(error);
    let (response, body) = response.into_parts();
    let bytes = to_bytes(body).await.expect("reading response body succeeds");
    let value = serde_json::from_slice(&bytes).expect("error JSON");
    (response, value)
}

#[actix_web::test]
async fn internal_errors_are_redacted() {
    let error = Error::internal("database password leaked")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}));

    let (response, body) = body_of(&error).await;

    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": TRACE_ID,
        })
    );
}

#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::invalid_request("bad")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"field": "name"}));

    let (_, body) = body_of(&error).await;

    assert_eq!(body.get("message"), Some(&json!("bad")));
    assert_eq!(body.get("details"), Some(&json!({"field": "name"})));
    assert_eq!(body.get("code"), Some(&json!("invalid_request")));
}
