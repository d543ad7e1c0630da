//! Port interface for caching joined bounding-box query results.
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::QueryResultRow;

use super::{ObservationCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum ObservationCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "observation cache backend failure: {message}",
        /// Serialisation or deserialisation of cached content failed.
        Serialization { message: String } =>
            "observation cache serialisation failed: {message}",
    }
}

/// Read-through cache for query results.
///
/// Callers treat every error as a miss; adapters never need to retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObservationCache: Send + Sync {
    /// Read the cached rows for `key`, `None` when absent or expired.
    async fn get(
        &self,
        key: &ObservationCacheKey,
    ) -> Result<Option<Vec<QueryResultRow>>, ObservationCacheError>;

    /// Store `rows` under `key`, expiring after `ttl`.
    async fn put(
        &self,
        key: &ObservationCacheKey,
        rows: &[QueryResultRow],
        ttl: Duration,
    ) -> Result<(), ObservationCacheError>;
}

/// Cache that never stores anything; used when no cache backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledObservationCache;

#[async_trait]
impl ObservationCache for DisabledObservationCache {
    async fn get(
        &self,
        _key: &ObservationCacheKey,
    ) -> Result<Option<Vec<QueryResultRow>>, ObservationCacheError> {
        Ok(None)
    }

    async fn put(
        &self,
        _key: &ObservationCacheKey,
        _rows: &[QueryResultRow],
        _ttl: Duration,
    ) -> Result<(), ObservationCacheError> {
        Ok(())
    }
}
