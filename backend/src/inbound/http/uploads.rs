//! Upload handlers: ingest, listing, CSV export and coverage lookup.
//!
//! ```text
//! POST /api/v1/uploads
//! GET  /api/v1/uploads
//! GET  /api/v1/uploads/{fileId}/download
//! GET  /api/v1/files/covering?latitude=..&longitude=..
//! ```
//!
//! All four require a session. CSV parsing happens client-side or in a
//! gateway; this adapter receives already-parsed rows.

use actix_web::http::header::{
    CONTENT_DISPOSITION, ContentDisposition, DispositionParam, DispositionType,
};
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{IngestFileRequest, ObservationInput, UploadSummary};
use crate::domain::{ElementId, Error, FileId, FileMetadata, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ErrorSchema, FileMetadataSchema, IngestFileResponseSchema, UploadSummarySchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, NumberOrText, coerce_row_f64, coerce_row_timestamp, parse_required_f64,
};

/// One parsed CSV row. Numbers may be JSON numbers or numeric strings.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRowBody {
    #[schema(value_type = f64, example = 42.35)]
    pub latitude: Option<NumberOrText>,
    #[schema(value_type = f64, example = -70.9)]
    pub longitude: Option<NumberOrText>,
    #[schema(value_type = f64, example = 14.2)]
    pub value: Option<NumberOrText>,
    /// Measurement time; defaults to the ingest time when omitted.
    #[schema(format = "date-time", example = "2024-04-01T00:00:00Z")]
    pub timestamp: Option<String>,
}

impl UploadRowBody {
    fn coerce(&self, row: usize) -> Result<ObservationInput, Error> {
        Ok(ObservationInput {
            latitude: coerce_row_f64(self.latitude.as_ref(), FieldName::new("latitude"), row)?,
            longitude: coerce_row_f64(self.longitude.as_ref(), FieldName::new("longitude"), row)?,
            value: coerce_row_f64(self.value.as_ref(), FieldName::new("value"), row)?,
            timestamp: coerce_row_timestamp(
                self.timestamp.as_deref(),
                FieldName::new("timestamp"),
                row,
            )?,
        })
    }
}

/// Request payload for ingesting one file of observations.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequestBody {
    #[schema(example = 1)]
    pub element_id: i64,
    pub rows: Vec<UploadRowBody>,
}

impl UploadRequestBody {
    fn into_request(self, uploader_id: UserId) -> Result<IngestFileRequest, Error> {
        let points = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| row.coerce(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(IngestFileRequest {
            uploader_id,
            element_id: ElementId::new(self.element_id),
            points,
        })
    }
}

/// Coordinate lookup parameters for `/files/covering`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CoveringParams {
    #[param(value_type = f64, example = 42.0)]
    pub latitude: Option<String>,
    #[param(value_type = f64, example = -70.0)]
    pub longitude: Option<String>,
}

/// Ingest a parsed file of observations for the logged-in user.
///
/// A `503` whose details carry `fileId` and `stage: "observations"` means the
/// metadata record was written but the points were not.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    request_body = UploadRequestBody,
    responses(
        (status = 201, description = "File ingested", body = IngestFileResponseSchema),
        (status = 400, description = "Invalid upload", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "A store is unavailable", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "createUpload",
    security(("SessionCookie" = []))
)]
#[post("/uploads")]
pub async fn create_upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UploadRequestBody>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let request = payload.into_inner().into_request(user_id)?;
    let response = state.ingest.ingest_file(request).await?;
    Ok(HttpResponse::Created().json(response))
}

/// List the logged-in user's uploads, newest first, with row previews.
#[utoipa::path(
    get,
    path = "/api/v1/uploads",
    responses(
        (status = 200, description = "Uploads with previews", body = [UploadSummarySchema]),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 503, description = "A store is unavailable", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "listUploads",
    security(("SessionCookie" = []))
)]
#[get("/uploads")]
pub async fn list_uploads(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UploadSummary>>> {
    let user_id = session.require_user_id()?;
    let uploads = state.uploads.list_uploads(user_id).await?;
    Ok(web::Json(uploads))
}

/// Download every point of a file as CSV.
#[utoipa::path(
    get,
    path = "/api/v1/uploads/{fileId}/download",
    params(("fileId" = i64, Path, description = "File identifier")),
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorized", body = ErrorSchema),
        (status = 404, description = "Unknown file", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "downloadUpload",
    security(("SessionCookie" = []))
)]
#[get("/uploads/{fileId}/download")]
pub async fn download_upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    file_id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let export = state
        .uploads
        .export_csv(FileId::new(file_id.into_inner()))
        .await?;

    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(export.filename)],
    };
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((CONTENT_DISPOSITION, disposition))
        .body(export.content))
}

/// Files whose bounding box contains the given coordinate.
#[utoipa::path(
    get,
    path = "/api/v1/files/covering",
    params(CoveringParams),
    responses(
        (status = 200, description = "Covering files", body = [FileMetadataSchema]),
        (status = 400, description = "Invalid coordinate", body = ErrorSchema),
        (status = 401, description = "Unauthorized", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "filesCovering",
    security(("SessionCookie" = []))
)]
#[get("/files/covering")]
pub async fn files_covering(
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<CoveringParams>,
) -> ApiResult<web::Json<Vec<FileMetadata>>> {
    session.require_user_id()?;
    let CoveringParams {
        latitude,
        longitude,
    } = params.into_inner();
    let latitude = parse_required_f64(latitude.as_deref(), FieldName::new("latitude"))?;
    let longitude = parse_required_f64(longitude.as_deref(), FieldName::new("longitude"))?;
    let files = state.uploads.files_covering(latitude, longitude).await?;
    Ok(web::Json(files))
}

#[cfg(test)]
#[path = "uploads_tests.rs"]
mod tests;
