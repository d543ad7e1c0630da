//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler plus the health probes, the
//! schema wrappers from [`crate::inbound::http::schemas`], and the session
//! cookie security scheme. The document backs Swagger UI in debug builds and
//! is exported with `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{
    ElementCategorySchema, ElementSchema, ErrorCodeSchema, ErrorSchema, FileMetadataSchema,
    IngestFileResponseSchema, PreviewRowSchema, QueryResultRowSchema, UploadSummarySchema,
    UploaderSummarySchema,
};
use crate::inbound::http::uploads::{UploadRequestBody, UploadRowBody};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie carrying the authenticated user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Marine observations API",
        description = "Ingest uploaded observation files and query observations by bounding box.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::observations::query_observations,
        crate::inbound::http::uploads::create_upload,
        crate::inbound::http::uploads::list_uploads,
        crate::inbound::http::uploads::download_upload,
        crate::inbound::http::uploads::files_covering,
        crate::inbound::http::elements::list_elements,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        QueryResultRowSchema,
        UploaderSummarySchema,
        FileMetadataSchema,
        IngestFileResponseSchema,
        UploadSummarySchema,
        PreviewRowSchema,
        ElementSchema,
        ElementCategorySchema,
        UploadRequestBody,
        UploadRowBody,
    )),
    tags(
        (name = "observations", description = "Bounding-box observation queries"),
        (name = "uploads", description = "File ingest, listing and export"),
        (name = "elements", description = "Measured quantities and their categories"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
