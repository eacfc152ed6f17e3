//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs keep their fields optional and stringly typed so a bad value
//! produces a structured `invalid_request` body naming the field instead of
//! the framework's plain-text rejection.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use serde_json::json;

use crate::domain::Error;

/// Months covered by a listing when the client sends no `from` date.
pub(crate) const DEFAULT_LISTING_MONTHS: u32 = 3;

/// Date format accepted by the `from` query parameter.
pub(crate) const FROM_DATE_FORMAT: &str = "%m-%d-%Y";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidTimestamp,
    InvalidDate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidDate => "invalid_date",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let details = match value {
        Some(value) => json!({ "field": field.as_str(), "value": value, "code": code.as_str() }),
        None => json!({ "field": field.as_str(), "code": code.as_str() }),
    };
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
        None,
    )
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a store identifier from a path segment. Identifiers are positive.
pub(crate) fn parse_id(value: &str, field: FieldName) -> Result<i64, Error> {
    value
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            let name = field.as_str();
            field_error(
                field,
                format!("{name} must be a positive integer"),
                ErrorCode::InvalidId,
                Some(value),
            )
        })
}

/// Accept an optional link to another row: absent or 0 means none, any
/// other value must be a positive id.
pub(crate) fn optional_link(value: Option<i64>, field: FieldName) -> Result<Option<i64>, Error> {
    match value {
        Some(id) if id < 0 => {
            let name = field.as_str();
            Err(field_error(
                field,
                format!("{name} must be 0 or a positive integer"),
                ErrorCode::InvalidId,
                Some(&id.to_string()),
            ))
        }
        Some(0) | None => Ok(None),
        Some(id) => Ok(Some(id)),
    }
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            field_error(
                field,
                format!("{name} must be an RFC 3339 timestamp"),
                ErrorCode::InvalidTimestamp,
                Some(value),
            )
        })
}

/// Resolve the `from` query parameter to midnight UTC of the given day, or
/// to [`DEFAULT_LISTING_MONTHS`] before `now` when it is absent.
pub(crate) fn parse_from_date(
    value: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, Error> {
    let field = FieldName::new("from");
    let Some(raw) = value else {
        return Ok(now
            .checked_sub_months(Months::new(DEFAULT_LISTING_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC));
    };
    NaiveDate::parse_from_str(raw, FROM_DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| {
            field_error(
                field,
                "from must be a date formatted MM-DD-YYYY".to_owned(),
                ErrorCode::InvalidDate,
                Some(raw),
            )
        })
}
