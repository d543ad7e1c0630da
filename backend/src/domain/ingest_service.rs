//! Ingest orchestration for uploaded observation files.
//!
//! Writes happen in two stores without a shared transaction: the metadata
//! record first (which assigns the file id), then the points tagged with it.
//! If the second write fails the metadata record stays behind; the error
//! carries the orphaned `fileId` so operators can clean it up. Query caches
//! are not invalidated.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    ElementRepository, FileMetadataRepository, IngestFileRequest, IngestFileResponse,
    ObservationIngest, ObservationInput, ObservationRepository,
};
use crate::domain::store_errors::{
    map_element_error, map_file_metadata_error, map_observation_error,
};
use crate::domain::{BoundingBox, BoundingBoxError, Error, NewFileMetadata, ObservationPoint};

/// Service implementing [`ObservationIngest`].
pub struct ObservationIngestService<O: ?Sized, F: ?Sized, E: ?Sized> {
    observations: Arc<O>,
    files: Arc<F>,
    elements: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<O: ?Sized, F: ?Sized, E: ?Sized> ObservationIngestService<O, F, E> {
    pub fn new(
        observations: Arc<O>,
        files: Arc<F>,
        elements: Arc<E>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            observations,
            files,
            elements,
            clock,
        }
    }
}

fn row_error(index: usize, err: &BoundingBoxError) -> Error {
    let field = match err {
        BoundingBoxError::NonFinite { field } | BoundingBoxError::OutOfRange { field, .. } => {
            *field
        }
        BoundingBoxError::EmptyInput | BoundingBoxError::InvertedBounds { .. } => "points",
    };
    Error::invalid_request(format!("row {index}: {err}"))
        .with_details(json!({ "row": index, "field": field }))
}

fn validate_points(points: &[ObservationInput]) -> Result<(), Error> {
    if points.is_empty() {
        return Err(Error::invalid_request("upload contains no observations")
            .with_details(json!({ "field": "rows" })));
    }
    for (index, point) in points.iter().enumerate() {
        point
            .coordinate()
            .validate()
            .map_err(|err| row_error(index, &err))?;
        if !point.value.is_finite() {
            return Err(row_error(index, &BoundingBoxError::NonFinite { field: "value" }));
        }
    }
    Ok(())
}

impl<O, F, E> ObservationIngestService<O, F, E>
where
    O: ObservationRepository + ?Sized,
    F: FileMetadataRepository + ?Sized,
    E: ElementRepository + ?Sized,
{
    async fn ensure_element_exists(&self, request: &IngestFileRequest) -> Result<(), Error> {
        let found = self
            .elements
            .find_by_id(request.element_id)
            .await
            .map_err(map_element_error)?;
        if found.is_none() {
            return Err(
                Error::invalid_request(format!("unknown element {}", request.element_id))
                    .with_details(json!({ "field": "elementId" })),
            );
        }
        Ok(())
    }
}

#[async_trait]
impl<O, F, E> ObservationIngest for ObservationIngestService<O, F, E>
where
    O: ObservationRepository + ?Sized,
    F: FileMetadataRepository + ?Sized,
    E: ElementRepository + ?Sized,
{
    async fn ingest_file(&self, request: IngestFileRequest) -> Result<IngestFileResponse, Error> {
        validate_points(&request.points)?;
        self.ensure_element_exists(&request).await?;

        let bounding_box =
            BoundingBox::from_points(request.points.iter().map(ObservationInput::coordinate))
                .map_err(|err| Error::invalid_request(err.to_string()))?;

        let now = self.clock.utc();
        let file = self
            .files
            .create(&NewFileMetadata {
                user_id: request.uploader_id,
                uploaded_at: now,
                bounding_box,
            })
            .await
            .map_err(map_file_metadata_error)?;

        let points: Vec<ObservationPoint> = request
            .points
            .iter()
            .map(|input| ObservationPoint {
                element_id: request.element_id,
                file_id: file.id,
                latitude: input.latitude,
                longitude: input.longitude,
                value: input.value,
                timestamp: input.timestamp.unwrap_or(now),
            })
            .collect();

        let count = match self.observations.create_many(&points).await {
            Ok(count) => count,
            Err(err) => {
                error!(
                    file_id = %file.id,
                    error = %err,
                    "observation write failed after metadata commit"
                );
                return Err(map_observation_error(err)
                    .with_details(json!({ "fileId": file.id, "stage": "observations" })));
            }
        };

        info!(
            file_id = %file.id,
            user_id = %request.uploader_id,
            element_id = %request.element_id,
            count,
            "ingested observation file"
        );
        Ok(IngestFileResponse { file, count })
    }
}

#[cfg(test)]
#[path = "ingest_service_tests.rs"]
mod tests;
