//! HTTP adapter mapping for domain errors.
//!
//! Services return [`LifelogError`] without knowing about HTTP. Handlers pass
//! it through [`map_service_error`] together with their [`Group`], which
//! decides whether a missing entity is the resource being addressed (404) or
//! a broken reference inside the request (422).

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, LifelogError, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Route group a handler belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Auth,
    Tags,
    Activities,
    Expenses,
}

fn not_found_or_unprocessable(owner: Group, group: Group, message: String) -> Error {
    if owner == group {
        Error::not_found(message)
    } else {
        Error::unprocessable(message)
    }
}

/// Translate a service failure into the transport envelope.
pub fn map_service_error(err: LifelogError, group: Group) -> Error {
    let message = err.to_string();
    match err {
        LifelogError::Validation(_) | LifelogError::PasswordLength => {
            debug!(%message, "request rejected");
            Error::invalid_request(message)
        }
        LifelogError::TagNotFound(_) => not_found_or_unprocessable(Group::Tags, group, message),
        LifelogError::ActivityNotFound(_) => {
            not_found_or_unprocessable(Group::Activities, group, message)
        }
        LifelogError::ExpenseNotFound(_) => {
            not_found_or_unprocessable(Group::Expenses, group, message)
        }
        LifelogError::DuplicateTagName(_) => Error::conflict(message),
        LifelogError::TagHasExpenses(_)
        | LifelogError::TagHasActivities(_)
        | LifelogError::ActivityHasExpenses(_)
        | LifelogError::InvalidToken(_) => Error::unprocessable(message),
        LifelogError::IncorrectCredentials => Error::unauthorized(message),
        LifelogError::HashNotFound
        | LifelogError::Token(_)
        | LifelogError::Internal(_)
        | LifelogError::Repository(_) => {
            error!(%message, ?group, "request failed");
            Error::internal(message)
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::UnprocessableEntity => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

#[cfg(test)]
mod tests;
