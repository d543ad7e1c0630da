//! Port for the observation store.
//!
//! The store is append-only: points are inserted in batches per uploaded
//! file and then only read, either by rectangle or by file.

use async_trait::async_trait;

use crate::domain::{FileId, ObservationFilter, ObservationPoint};

use super::define_port_error;

define_port_error! {
    /// Errors raised by observation store adapters.
    pub enum ObservationRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "observation store connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "observation store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// Points inside the filter's bounds, newest first.
    ///
    /// Every bound is optional and inclusive. No row cap is applied.
    async fn find_in_bounds(
        &self,
        filter: &ObservationFilter,
    ) -> Result<Vec<ObservationPoint>, ObservationRepositoryError>;

    /// Points belonging to one file, newest first, optionally capped.
    async fn find_by_file(
        &self,
        file_id: FileId,
        limit: Option<usize>,
    ) -> Result<Vec<ObservationPoint>, ObservationRepositoryError>;

    /// Insert a batch of points and return how many were written.
    async fn create_many(
        &self,
        points: &[ObservationPoint],
    ) -> Result<usize, ObservationRepositoryError>;
}

/// Fixture implementation for tests that do not exercise the observation store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureObservationRepository;

#[async_trait]
impl ObservationRepository for FixtureObservationRepository {
    async fn find_in_bounds(
        &self,
        _filter: &ObservationFilter,
    ) -> Result<Vec<ObservationPoint>, ObservationRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_file(
        &self,
        _file_id: FileId,
        _limit: Option<usize>,
    ) -> Result<Vec<ObservationPoint>, ObservationRepositoryError> {
        Ok(Vec::new())
    }

    async fn create_many(
        &self,
        points: &[ObservationPoint],
    ) -> Result<usize, ObservationRepositoryError> {
        Ok(points.len())
    }
}
