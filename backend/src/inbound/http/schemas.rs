//! OpenAPI schema definitions for domain types.
//!
//! The domain error envelope does not derive `ToSchema`; the wrappers here
//! mirror its shape so the adapter layer owns every utoipa concern.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The bearer token is missing, invalid or the password was wrong.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The addressed entity does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A tag with the same name already exists.
    #[schema(rename = "conflict")]
    Conflict,
    /// The request references missing entities or is blocked by references.
    #[schema(rename = "unprocessable_entity")]
    UnprocessableEntity,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Every failing endpoint answers with this envelope.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "tag 4 not found")]
    message: String,
    /// Correlation identifier echoed from the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level detail for validation failures.
    details: Option<serde_json::Value>,
}
