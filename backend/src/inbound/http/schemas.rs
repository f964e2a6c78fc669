//! OpenAPI schemas for the error envelope.
//!
//! The domain error types stay free of utoipa derives; these mirrors are
//! registered in their place.

use serde::Serialize;
use utoipa::ToSchema;

/// Machine-readable error code.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    /// Username or email already registered.
    Conflict,
    /// A backing store could not be reached.
    ServiceUnavailable,
    InternalError,
}

/// Error body returned by every endpoint.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSchema {
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    #[schema(example = "Username already exists")]
    message: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// For field errors: `{ "field": ..., "code": ... }`.
    details: Option<serde_json::Value>,
}
