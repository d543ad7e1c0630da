//! Upload records kept in the relational store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BoundingBox, UploaderSummary, UserId};

/// Store-generated identifier of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(i64);

impl FileId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata for one uploaded file.
///
/// The bounding box encloses every observation point tagged with `id`.
/// Records are written once and never updated.
///
/// Serialised flat: `{ "id", "userId", "uploadedAt", "latMin", "latMax",
/// "longMin", "longMax" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: FileId,
    pub user_id: UserId,
    pub uploaded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub bounding_box: BoundingBox,
}

/// Insert payload for [`FileMetadata`]; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFileMetadata {
    pub user_id: UserId,
    pub uploaded_at: DateTime<Utc>,
    pub bounding_box: BoundingBox,
}

/// Uploader identity resolved for a file id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUploader {
    pub file_id: FileId,
    pub uploader: UploaderSummary,
}
