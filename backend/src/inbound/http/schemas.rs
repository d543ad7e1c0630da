//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The wrappers mirror the JSON shape of their domain counterparts, including
//! flattened bounding boxes and camelCase field names.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
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
    /// The request conflicts with stored state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store could not be reached.
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
    #[schema(example = "latMin must be a number")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, e.g. `{ "field": "latMin", "code": "invalid_number" }`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::UploaderSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UploaderSummary, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UploaderSummarySchema {
    #[schema(example = 9)]
    id: i64,
    #[schema(example = "buoy@example.org")]
    email: String,
    #[schema(example = "Buoy Team")]
    full_name: Option<String>,
}

/// OpenAPI schema for [`crate::domain::QueryResultRow`].
///
/// An observation point with its uploader and element name attached; `user`
/// is omitted when the file or its uploader no longer resolves.
#[derive(ToSchema)]
#[schema(as = crate::domain::QueryResultRow, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct QueryResultRowSchema {
    #[schema(example = 1)]
    element_id: i64,
    #[schema(example = 3)]
    file_id: i64,
    #[schema(example = 42.5)]
    latitude: f64,
    #[schema(example = -70.0)]
    longitude: f64,
    #[schema(example = 12.25)]
    value: f64,
    #[schema(format = "date-time", example = "2024-07-01T09:00:00Z")]
    timestamp: String,
    user: Option<UploaderSummarySchema>,
    #[schema(example = "Sea Surface Temperature")]
    element_name: String,
}

/// OpenAPI schema for [`crate::domain::FileMetadata`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FileMetadata, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FileMetadataSchema {
    #[schema(example = 77)]
    id: i64,
    #[schema(example = 5)]
    user_id: i64,
    #[schema(format = "date-time", example = "2024-04-02T15:30:00Z")]
    uploaded_at: String,
    #[schema(example = -1.0)]
    lat_min: f64,
    #[schema(example = 2.0)]
    lat_max: f64,
    #[schema(example = -1.0)]
    long_min: f64,
    #[schema(example = 2.0)]
    long_max: f64,
}

/// OpenAPI schema for [`crate::domain::ports::IngestFileResponse`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::IngestFileResponse, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct IngestFileResponseSchema {
    #[schema(example = 77)]
    id: i64,
    #[schema(example = 5)]
    user_id: i64,
    #[schema(format = "date-time", example = "2024-04-02T15:30:00Z")]
    uploaded_at: String,
    lat_min: f64,
    lat_max: f64,
    long_min: f64,
    long_max: f64,
    /// Number of observation points written.
    #[schema(example = 120)]
    count: u64,
}

/// OpenAPI schema for [`crate::domain::ports::PreviewRow`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::PreviewRow, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PreviewRowSchema {
    #[schema(example = 1)]
    element_id: i64,
    #[schema(example = "Sea Surface Temperature")]
    element_name: String,
    #[schema(example = "Physical")]
    category_name: String,
    latitude: f64,
    longitude: f64,
    value: f64,
    #[schema(format = "date-time")]
    timestamp: String,
}

/// OpenAPI schema for [`crate::domain::ports::UploadSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::UploadSummary, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UploadSummarySchema {
    #[schema(example = 77)]
    id: i64,
    #[schema(example = 5)]
    user_id: i64,
    #[schema(format = "date-time", example = "2024-04-02T15:30:00Z")]
    uploaded_at: String,
    lat_min: f64,
    lat_max: f64,
    long_min: f64,
    long_max: f64,
    /// Newest rows of the file, at most ten.
    preview: Vec<PreviewRowSchema>,
}

/// OpenAPI schema for [`crate::domain::ElementCategory`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ElementCategory)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ElementCategorySchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Physical")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::Element`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Element)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ElementSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Sea Surface Temperature")]
    name: String,
    category: Option<ElementCategorySchema>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_domain_code() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "conflict",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_uses_camel_case_trace_id() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"));
        assert!(!schema_json.contains("trace_id"));
    }

    #[test]
    fn query_row_schema_matches_wire_names() {
        let schema_json = schema_to_json::<QueryResultRowSchema>();
        for field in [
            "elementId",
            "fileId",
            "latitude",
            "longitude",
            "value",
            "user",
            "elementName",
        ] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn upload_summary_schema_flattens_file_fields() {
        let schema_json = schema_to_json::<UploadSummarySchema>();
        assert!(schema_json.contains("uploadedAt"));
        assert!(schema_json.contains("latMin"));
        assert!(schema_json.contains("preview"));
    }
}
