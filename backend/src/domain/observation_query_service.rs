//! Cache-aside bounding-box query service.
//!
//! A lookup derives the cache key from the filter and returns cached rows
//! when present. On a miss it reads the observation store, resolves the
//! uploader of every distinct file in one batch call, caches the joined rows
//! and returns them.
//!
//! Concurrent identical misses are not coalesced: both read the stores and
//! both write the cache, and the last write's TTL wins. Ingest does not
//! invalidate entries, so results may lag new uploads by up to the TTL.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    FileMetadataRepository, NoOpObservationCacheMetrics, ObservationCache, ObservationCacheKey,
    ObservationCacheMetrics, ObservationQuery, ObservationRepository,
};
use crate::domain::store_errors::{map_file_metadata_error, map_observation_error};
use crate::domain::{Error, FileId, ObservationFilter, ObservationPoint, QueryResultRow};

/// Lifetime of a cached query result.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Query service implementing [`ObservationQuery`].
pub struct ObservationQueryService<
    O: ?Sized,
    F: ?Sized,
    C: ?Sized,
    M: ?Sized = NoOpObservationCacheMetrics,
> {
    observations: Arc<O>,
    files: Arc<F>,
    cache: Arc<C>,
    metrics: Arc<M>,
    ttl: Duration,
}

impl<O: ?Sized, F: ?Sized, C: ?Sized> ObservationQueryService<O, F, C> {
    /// Create a service with no-op metrics and the default TTL.
    pub fn new(observations: Arc<O>, files: Arc<F>, cache: Arc<C>) -> Self {
        Self {
            observations,
            files,
            cache,
            metrics: Arc::new(NoOpObservationCacheMetrics),
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl<O: ?Sized, F: ?Sized, C: ?Sized, M: ?Sized> ObservationQueryService<O, F, C, M> {
    /// Replace the metrics recorder.
    pub fn with_metrics<N: ?Sized>(self, metrics: Arc<N>) -> ObservationQueryService<O, F, C, N> {
        ObservationQueryService {
            observations: self.observations,
            files: self.files,
            cache: self.cache,
            metrics,
            ttl: self.ttl,
        }
    }

    /// Override how long cached results live.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl<O, F, C, M> ObservationQueryService<O, F, C, M>
where
    O: ObservationRepository + ?Sized,
    F: FileMetadataRepository + ?Sized,
    C: ObservationCache + ?Sized,
    M: ObservationCacheMetrics + ?Sized,
{
    async fn read_cache(&self, key: &ObservationCacheKey) -> Option<Vec<QueryResultRow>> {
        match self.cache.get(key).await {
            Ok(Some(rows)) => {
                debug!(cache_key = %key, rows = rows.len(), "observation cache hit");
                if let Err(error) = self.metrics.record_hit().await {
                    debug!(%error, "failed to record cache hit");
                }
                Some(rows)
            }
            Ok(None) => {
                debug!(cache_key = %key, "observation cache miss");
                if let Err(error) = self.metrics.record_miss().await {
                    debug!(%error, "failed to record cache miss");
                }
                None
            }
            Err(error) => {
                warn!(cache_key = %key, %error, "observation cache read failed; querying stores");
                self.record_cache_error().await;
                None
            }
        }
    }

    async fn write_cache(&self, key: &ObservationCacheKey, rows: &[QueryResultRow]) {
        if let Err(error) = self.cache.put(key, rows, self.ttl).await {
            warn!(cache_key = %key, %error, "observation cache write failed");
            self.record_cache_error().await;
        }
    }

    async fn record_cache_error(&self) {
        if let Err(error) = self.metrics.record_error().await {
            debug!(%error, "failed to record cache error");
        }
    }

    async fn join_uploaders(
        &self,
        points: Vec<ObservationPoint>,
    ) -> Result<Vec<QueryResultRow>, Error> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let file_ids: Vec<FileId> = points
            .iter()
            .map(|point| point.file_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let uploaders: HashMap<_, _> = self
            .files
            .find_uploaders(&file_ids)
            .await
            .map_err(map_file_metadata_error)?
            .into_iter()
            .map(|entry| (entry.file_id, entry.uploader))
            .collect();

        Ok(points
            .into_iter()
            .map(|point| QueryResultRow {
                user: uploaders.get(&point.file_id).cloned(),
                point,
            })
            .collect())
    }
}

#[async_trait]
impl<O, F, C, M> ObservationQuery for ObservationQueryService<O, F, C, M>
where
    O: ObservationRepository + ?Sized,
    F: FileMetadataRepository + ?Sized,
    C: ObservationCache + ?Sized,
    M: ObservationCacheMetrics + ?Sized,
{
    async fn query_by_bounding_box(
        &self,
        filter: ObservationFilter,
    ) -> Result<Vec<QueryResultRow>, Error> {
        let key = ObservationCacheKey::for_filter(&filter);
        if let Some(rows) = self.read_cache(&key).await {
            return Ok(rows);
        }

        let points = self
            .observations
            .find_in_bounds(&filter)
            .await
            .map_err(map_observation_error)?;
        let rows = self.join_uploaders(points).await?;

        self.write_cache(&key, &rows).await;
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "observation_query_service_tests.rs"]
mod tests;
