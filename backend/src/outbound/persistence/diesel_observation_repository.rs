//! PostgreSQL-backed `ObservationRepository` for the observation store.
//!
//! Bounding-box reads use the `(latitude, longitude)` index; bulk writes are
//! chunked inside a single transaction so a failed upload leaves no partial
//! point set behind.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ObservationRepository, ObservationRepositoryError};
use crate::domain::{ElementId, FileId, ObservationFilter, ObservationPoint};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewObservationRow, ObservationRow};
use super::observation_schema::observation_points;
use super::pool::{DbPool, PoolError};

/// Rows per INSERT statement. Keeps bind parameters well under the
/// PostgreSQL limit of 65535 (six columns per row).
const INSERT_CHUNK_SIZE: usize = 5_000;

/// Diesel-backed implementation of the observation repository port.
#[derive(Clone)]
pub struct DieselObservationRepository {
    pool: DbPool,
}

impl DieselObservationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ObservationRepositoryError {
    map_basic_pool_error(error, ObservationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ObservationRepositoryError {
    map_basic_diesel_error(
        error,
        ObservationRepositoryError::query,
        ObservationRepositoryError::connection,
    )
}

fn row_to_point(row: ObservationRow) -> ObservationPoint {
    ObservationPoint {
        element_id: ElementId::new(row.element_id),
        file_id: FileId::new(row.file_id),
        latitude: row.latitude,
        longitude: row.longitude,
        value: row.value,
        timestamp: row.observed_at,
    }
}

fn point_to_row(point: &ObservationPoint) -> NewObservationRow {
    NewObservationRow {
        element_id: point.element_id.value(),
        file_id: point.file_id.value(),
        latitude: point.latitude,
        longitude: point.longitude,
        value: point.value,
        observed_at: point.timestamp,
    }
}

#[async_trait]
impl ObservationRepository for DieselObservationRepository {
    async fn find_in_bounds(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<ObservationPoint>, ObservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = observation_points::table
            .select(ObservationRow::as_select())
            .into_boxed();
        if let Some(lat_min) = filter.lat_min {
            query = query.filter(observation_points::latitude.ge(lat_min));
        }
        if let Some(lat_max) = filter.lat_max {
            query = query.filter(observation_points::latitude.le(lat_max));
        }
        if let Some(long_min) = filter.long_min {
            query = query.filter(observation_points::longitude.ge(long_min));
        }
        if let Some(long_max) = filter.long_max {
            query = query.filter(observation_points::longitude.le(long_max));
        }
        if let Some(element_id) = filter.element_id {
            query = query.filter(observation_points::element_id.eq(element_id.value()));
        }

        let rows: Vec<ObservationRow> = query
            .order((
                observation_points::observed_at.desc(),
                observation_points::id.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_point).collect())
    }

    async fn find_by_file(
        &self,
        file_id: FileId,
        limit: Option<usize>,
    ) -> Result<Vec<ObservationPoint>, ObservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = observation_points::table
            .filter(observation_points::file_id.eq(file_id.value()))
            .select(ObservationRow::as_select())
            .order((
                observation_points::observed_at.desc(),
                observation_points::id.asc(),
            ))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let rows: Vec<ObservationRow> = query
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_point).collect())
    }

    async fn create_many(
        &self,
        points: &[ObservationPoint],
    ) -> Result<usize, ObservationRepositoryError> {
        if points.is_empty() {
            return Ok(0);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewObservationRow> = points.iter().map(point_to_row).collect();

        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
                    inserted += diesel::insert_into(observation_points::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok::<usize, diesel::result::Error>(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
