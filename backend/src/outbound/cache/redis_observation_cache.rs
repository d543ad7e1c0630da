//! Redis-backed `ObservationCache`.
//!
//! Entries are JSON arrays of query rows stored with `SET key value EX ttl`.
//! Keys come from [`ObservationCacheKey`] unchanged, so identical queries map
//! to identical entries across every process sharing the Redis instance.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{self, Pool};
use bb8_redis::redis::{AsyncCommands, RedisError};
use tracing::debug;

use crate::domain::QueryResultRow;
use crate::domain::ports::{ObservationCache, ObservationCacheError, ObservationCacheKey};

/// Errors raised while building the Redis connection pool.
#[derive(Debug, thiserror::Error)]
pub enum RedisCacheBuildError {
    #[error("invalid redis url: {0}")]
    Url(#[source] RedisError),
    #[error("failed to build redis pool: {0}")]
    Pool(#[source] RedisError),
}

/// Observation cache stored in Redis through a `bb8` pool.
#[derive(Clone)]
pub struct RedisObservationCache {
    pool: Pool<RedisConnectionManager>,
}

impl RedisObservationCache {
    /// Build a pool for `redis_url` with the given checkout timeout.
    ///
    /// Connections are opened lazily, so an unreachable server surfaces as a
    /// cache error on first use rather than here.
    ///
    /// # Errors
    ///
    /// Returns [`RedisCacheBuildError::Url`] if the URL cannot be parsed.
    pub async fn connect(
        redis_url: &str,
        max_size: u32,
        connection_timeout: Duration,
    ) -> Result<Self, RedisCacheBuildError> {
        let manager = RedisConnectionManager::new(redis_url).map_err(RedisCacheBuildError::Url)?;
        let pool = bb8::Pool::builder()
            .max_size(max_size)
            .min_idle(Some(0))
            .connection_timeout(connection_timeout)
            .build(manager)
            .await
            .map_err(RedisCacheBuildError::Pool)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn new(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }
}

fn backend_error(error: impl std::fmt::Display) -> ObservationCacheError {
    ObservationCacheError::backend(error.to_string())
}

/// Decode a cached payload.
fn decode(payload: &str) -> Result<Vec<QueryResultRow>, ObservationCacheError> {
    serde_json::from_str(payload)
        .map_err(|err| ObservationCacheError::serialization(err.to_string()))
}

/// Encode rows for storage.
fn encode(rows: &[QueryResultRow]) -> Result<String, ObservationCacheError> {
    serde_json::to_string(rows).map_err(|err| ObservationCacheError::serialization(err.to_string()))
}

/// Redis rejects `EX 0`; round sub-second TTLs up to one second.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl ObservationCache for RedisObservationCache {
    async fn get(
        &self,
        key: &ObservationCacheKey,
    ) -> Result<Option<Vec<QueryResultRow>>, ObservationCacheError> {
        let mut conn = self.pool.get().await.map_err(backend_error)?;
        let payload: Option<String> = conn.get(key.as_str()).await.map_err(backend_error)?;
        debug!(key = %key, hit = payload.is_some(), "redis cache lookup");
        payload.as_deref().map(decode).transpose()
    }

    async fn put(
        &self,
        key: &ObservationCacheKey,
        rows: &[QueryResultRow],
        ttl: Duration,
    ) -> Result<(), ObservationCacheError> {
        let payload = encode(rows)?;
        let mut conn = self.pool.get().await.map_err(backend_error)?;
        let () = conn
            .set_ex(key.as_str(), payload, ttl_seconds(ttl))
            .await
            .map_err(backend_error)?;
        Ok(())
    }
}
