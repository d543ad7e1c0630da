//! Driving port for ingesting one uploaded file of observations.
//!
//! Inbound adapters parse and coerce the uploaded rows; this port validates
//! them, derives the file's bounding box and writes both stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Coordinate, ElementId, Error, FileMetadata, UserId};

/// One parsed observation row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationInput {
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
    /// Falls back to the ingest time when absent.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ObservationInput {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Request to ingest the rows of one file for a single element.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestFileRequest {
    pub uploader_id: UserId,
    pub element_id: ElementId,
    pub points: Vec<ObservationInput>,
}

/// Outcome of a successful ingest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestFileResponse {
    #[serde(flatten)]
    pub file: FileMetadata,
    /// Number of observation points written.
    pub count: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObservationIngest: Send + Sync {
    /// Validate and persist one file.
    ///
    /// Writes the metadata record first, then the points. A failure after
    /// the metadata write is reported with the orphaned file id in the
    /// error details.
    async fn ingest_file(&self, request: IngestFileRequest) -> Result<IngestFileResponse, Error>;
}

/// Fixture ingest that rejects every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureObservationIngest;

#[async_trait]
impl ObservationIngest for FixtureObservationIngest {
    async fn ingest_file(&self, _request: IngestFileRequest) -> Result<IngestFileResponse, Error> {
        Err(Error::service_unavailable("ingest is not configured"))
    }
}
