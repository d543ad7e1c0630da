//! Read path over a user's uploads: listings with previews, CSV export and
//! coverage lookups.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::SecondsFormat;
use tracing::debug;

use crate::domain::ports::{
    CsvExport, ElementRepository, FileMetadataRepository, ObservationRepository, PREVIEW_ROWS,
    PreviewRow, UploadSummary, UploadsQuery,
};
use crate::domain::store_errors::{
    map_element_error, map_file_metadata_error, map_observation_error,
};
use crate::domain::{Element, ElementId, Error, FileId, FileMetadata, ObservationPoint, UserId};

/// Header line of exported CSV files.
pub const CSV_HEADER: &str = "latitude,longitude,value,elementId,timestamp";

const UNKNOWN_ELEMENT: &str = "Unknown";
const UNCATEGORIZED: &str = "Uncategorized";

/// Render points as CSV.
///
/// Lines are separated by `\n` with no trailing newline. Timestamps use
/// RFC 3339 with millisecond precision and a `Z` suffix.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use marine_backend::domain::{ElementId, FileId, ObservationPoint, render_csv};
///
/// let point = ObservationPoint {
///     element_id: ElementId::new(2),
///     file_id: FileId::new(1),
///     latitude: 1.5,
///     longitude: -3.0,
///     value: 35.1,
///     timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().expect("valid"),
/// };
/// assert_eq!(
///     render_csv(&[point]),
///     "latitude,longitude,value,elementId,timestamp\n1.5,-3,35.1,2,2024-01-02T03:04:05.000Z"
/// );
/// ```
pub fn render_csv(points: &[ObservationPoint]) -> String {
    let lines = points.iter().map(|point| {
        format!(
            "{},{},{},{},{}",
            point.latitude,
            point.longitude,
            point.value,
            point.element_id,
            point.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
    });
    std::iter::once(CSV_HEADER.to_owned())
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

fn preview_row(point: ObservationPoint, elements: &HashMap<ElementId, Element>) -> PreviewRow {
    let element = elements.get(&point.element_id);
    PreviewRow {
        element_id: point.element_id,
        element_name: element.map_or(UNKNOWN_ELEMENT, |e| e.name.as_str()).to_owned(),
        category_name: element.map_or(UNCATEGORIZED, Element::category_name).to_owned(),
        latitude: point.latitude,
        longitude: point.longitude,
        value: point.value,
        timestamp: point.timestamp,
    }
}

/// Service implementing [`UploadsQuery`].
pub struct UploadsService<O: ?Sized, F: ?Sized, E: ?Sized> {
    observations: Arc<O>,
    files: Arc<F>,
    elements: Arc<E>,
}

impl<O: ?Sized, F: ?Sized, E: ?Sized> UploadsService<O, F, E> {
    pub fn new(observations: Arc<O>, files: Arc<F>, elements: Arc<E>) -> Self {
        Self {
            observations,
            files,
            elements,
        }
    }
}

#[async_trait]
impl<O, F, E> UploadsQuery for UploadsService<O, F, E>
where
    O: ObservationRepository + ?Sized,
    F: FileMetadataRepository + ?Sized,
    E: ElementRepository + ?Sized,
{
    async fn list_uploads(&self, user_id: UserId) -> Result<Vec<UploadSummary>, Error> {
        let files = self
            .files
            .list_for_user(user_id)
            .await
            .map_err(map_file_metadata_error)?;

        let mut samples = Vec::with_capacity(files.len());
        for file in files {
            let points = self
                .observations
                .find_by_file(file.id, Some(PREVIEW_ROWS))
                .await
                .map_err(map_observation_error)?;
            samples.push((file, points));
        }

        let elements: HashMap<ElementId, Element> =
            if samples.iter().any(|(_, points)| !points.is_empty()) {
                self.elements
                    .list_elements(None)
                    .await
                    .map_err(map_element_error)?
                    .into_iter()
                    .map(|element| (element.id, element))
                    .collect()
            } else {
                HashMap::new()
            };

        debug!(%user_id, uploads = samples.len(), "listed uploads");
        Ok(samples
            .into_iter()
            .map(|(file, points)| UploadSummary {
                file,
                preview: points
                    .into_iter()
                    .map(|point| preview_row(point, &elements))
                    .collect(),
            })
            .collect())
    }

    async fn export_csv(&self, file_id: FileId) -> Result<CsvExport, Error> {
        self.files
            .find_by_id(file_id)
            .await
            .map_err(map_file_metadata_error)?
            .ok_or_else(|| Error::not_found(format!("file {file_id} not found")))?;

        let points = self
            .observations
            .find_by_file(file_id, None)
            .await
            .map_err(map_observation_error)?;

        Ok(CsvExport {
            file_id,
            filename: format!("file_{file_id}.csv"),
            content: render_csv(&points),
        })
    }

    async fn files_covering(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<FileMetadata>, Error> {
        self.files
            .find_covering(latitude, longitude)
            .await
            .map_err(map_file_metadata_error)
    }
}

#[cfg(test)]
#[path = "uploads_service_tests.rs"]
mod tests;
