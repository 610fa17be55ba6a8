//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the resource's current state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A required server-side setting is missing.
    #[schema(rename = "configuration_error")]
    ConfigurationError,
    /// An upstream provider failed the request.
    #[schema(rename = "upstream_error")]
    UpstreamError,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Title is required")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "0f6d3c4e-2f3b-4c1d-9a43-0c9b7f3f2b61")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::MutationKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MutationKind, rename_all = "camelCase")]
pub enum MutationKindSchema {
    Create,
    Update,
    Delete,
    DeleteAll,
    Summarize,
}

/// Status half of [`MutationStateSchema`].
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub enum MutationStatusSchema {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// OpenAPI schema for [`crate::domain::MutationState`].
///
/// `notice` is present for `succeeded` and `failed`.
#[derive(ToSchema)]
#[schema(as = crate::domain::MutationState)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MutationStateSchema {
    status: MutationStatusSchema,
    #[schema(example = "Note created successfully")]
    notice: Option<String>,
}
