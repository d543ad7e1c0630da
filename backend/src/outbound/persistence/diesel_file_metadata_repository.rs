//! PostgreSQL-backed `FileMetadataRepository` for the relational store.
//!
//! Uploader lookups join `files` to `users` and select only public columns;
//! credential hashes never leave this module.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{FileMetadataRepository, FileMetadataRepositoryError};
use crate::domain::{
    BoundingBox, FileId, FileMetadata, FileUploader, NewFileMetadata, UploaderSummary, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{FileRow, NewFileRow, UploaderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{files, users};

/// Diesel-backed implementation of the file metadata repository port.
#[derive(Clone)]
pub struct DieselFileMetadataRepository {
    pool: DbPool,
}

impl DieselFileMetadataRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FileMetadataRepositoryError {
    map_basic_pool_error(error, FileMetadataRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FileMetadataRepositoryError {
    map_basic_diesel_error(
        error,
        FileMetadataRepositoryError::query,
        FileMetadataRepositoryError::connection,
    )
}

/// Convert a database row into domain metadata, re-validating the rectangle.
fn row_to_metadata(row: FileRow) -> Result<FileMetadata, FileMetadataRepositoryError> {
    let FileRow {
        id,
        user_id,
        uploaded_at,
        lat_min,
        lat_max,
        long_min,
        long_max,
    } = row;

    let bounding_box = BoundingBox::new(lat_min, lat_max, long_min, long_max).map_err(|err| {
        FileMetadataRepositoryError::query(format!("file {id} has an invalid bounding box: {err}"))
    })?;

    Ok(FileMetadata {
        id: FileId::new(id),
        user_id: UserId::new(user_id),
        uploaded_at,
        bounding_box,
    })
}

fn rows_to_metadata(rows: Vec<FileRow>) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError> {
    rows.into_iter().map(row_to_metadata).collect()
}

fn new_row(metadata: &NewFileMetadata) -> NewFileRow {
    let bbox = metadata.bounding_box;
    NewFileRow {
        user_id: metadata.user_id.value(),
        uploaded_at: metadata.uploaded_at,
        lat_min: bbox.lat_min(),
        lat_max: bbox.lat_max(),
        long_min: bbox.long_min(),
        long_max: bbox.long_max(),
    }
}

#[async_trait]
impl FileMetadataRepository for DieselFileMetadataRepository {
    async fn create(
        &self,
        metadata: &NewFileMetadata,
    ) -> Result<FileMetadata, FileMetadataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: FileRow = diesel::insert_into(files::table)
            .values(new_row(metadata))
            .returning(FileRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_metadata(row)
    }

    async fn find_by_id(
        &self,
        file_id: FileId,
    ) -> Result<Option<FileMetadata>, FileMetadataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<FileRow> = files::table
            .find(file_id.value())
            .select(FileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_metadata).transpose()
    }

    async fn find_uploaders(
        &self,
        file_ids: &[FileId],
    ) -> Result<Vec<FileUploader>, FileMetadataRepositoryError> {
        if file_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i64> = file_ids.iter().map(|id| id.value()).collect();

        let rows: Vec<(i64, UploaderRow)> = files::table
            .inner_join(users::table)
            .filter(files::id.eq_any(ids))
            .select((files::id, UploaderRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(file_id, user)| FileUploader {
                file_id: FileId::new(file_id),
                uploader: UploaderSummary {
                    id: UserId::new(user.id),
                    email: user.email,
                    full_name: user.full_name,
                },
            })
            .collect())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FileRow> = files::table
            .filter(files::user_id.eq(user_id.value()))
            .select(FileRow::as_select())
            .order((files::uploaded_at.desc(), files::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_metadata(rows)
    }

    async fn find_covering(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<FileMetadata>, FileMetadataRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FileRow> = files::table
            .filter(files::lat_min.le(latitude))
            .filter(files::lat_max.ge(latitude))
            .filter(files::long_min.le(longitude))
            .filter(files::long_max.ge(longitude))
            .select(FileRow::as_select())
            .order(files::uploaded_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_metadata(rows)
    }
}
