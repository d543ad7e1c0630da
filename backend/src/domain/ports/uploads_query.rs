//! Driving port for reading back a user's uploads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{ElementId, Error, FileId, FileMetadata, UserId};

/// Number of observation rows shown per upload in listings.
pub const PREVIEW_ROWS: usize = 10;

/// Observation row annotated with element and category names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub element_id: ElementId,
    pub element_name: String,
    pub category_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// One upload with the newest few rows it contained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    #[serde(flatten)]
    pub file: FileMetadata,
    pub preview: Vec<PreviewRow>,
}

/// Rendered CSV download for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_id: FileId,
    pub filename: String,
    pub content: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadsQuery: Send + Sync {
    /// Uploads by `user_id`, newest first, each with a short preview.
    async fn list_uploads(&self, user_id: UserId) -> Result<Vec<UploadSummary>, Error>;

    /// Render every point of a file as CSV.
    async fn export_csv(&self, file_id: FileId) -> Result<CsvExport, Error>;

    /// Files whose rectangle contains the coordinate.
    async fn files_covering(&self, latitude: f64, longitude: f64)
    -> Result<Vec<FileMetadata>, Error>;
}

/// Fixture query with no uploads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUploadsQuery;

#[async_trait]
impl UploadsQuery for FixtureUploadsQuery {
    async fn list_uploads(&self, _user_id: UserId) -> Result<Vec<UploadSummary>, Error> {
        Ok(Vec::new())
    }

    async fn export_csv(&self, file_id: FileId) -> Result<CsvExport, Error> {
        Err(Error::not_found(format!("file {file_id} not found")))
    }

    async fn files_covering(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<FileMetadata>, Error> {
        Ok(Vec::new())
    }
}
