//! Port for upload records in the relational store.

use async_trait::async_trait;

use crate::domain::{FileId, FileMetadata, FileUploader, NewFileMetadata, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by file metadata repository adapters.
    pub enum FileMetadataRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "file metadata repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "file metadata repository query failed: {message}",
    }
}

/// Port for writing upload records and resolving their uploaders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileMetadataRepository: Send + Sync {
    /// Persist a new record and return it with its generated id.
    async fn create(
        &self,
        metadata: &NewFileMetadata,
    ) -> Result<FileMetadata, FileMetadataRepositoryError>;

    /// Find a record by id.
    async fn find_by_id(
        &self,
        file_id: FileId,
    ) -> Result<Option<FileMetadata>, FileMetadataRepositoryError>;

    /// Resolve uploader identities for a batch of file ids in one round trip.
    ///
    /// Ids without a record are absent from the result.
    async fn find_uploaders(
        &self,
        file_ids: &[FileId],
    ) -> Result<Vec<FileUploader>, FileMetadataRepositoryError>;

    /// Records uploaded by `user_id`, newest first.
    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError>;

    /// Records whose rectangle contains the coordinate, edges inclusive.
    async fn find_covering(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError>;
}

/// Fixture implementation for tests that do not exercise upload records.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFileMetadataRepository;

#[async_trait]
impl FileMetadataRepository for FixtureFileMetadataRepository {
    async fn create(
        &self,
        metadata: &NewFileMetadata,
    ) -> Result<FileMetadata, FileMetadataRepositoryError> {
        Ok(FileMetadata {
            id: FileId::new(1),
            user_id: metadata.user_id,
            uploaded_at: metadata.uploaded_at,
            bounding_box: metadata.bounding_box,
        })
    }

    async fn find_by_id(
        &self,
        _file_id: FileId,
    ) -> Result<Option<FileMetadata>, FileMetadataRepositoryError> {
        Ok(None)
    }

    async fn find_uploaders(
        &self,
        _file_ids: &[FileId],
    ) -> Result<Vec<FileUploader>, FileMetadataRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_for_user(
        &self,
        _user_id: UserId,
    ) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_covering(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError> {
        Ok(Vec::new())
    }
}
