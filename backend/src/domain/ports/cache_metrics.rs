//! Domain port for recording observation cache outcomes.
//!
//! Keeps the query service independent of the metrics backend. The
//! Prometheus adapter lives in `outbound::metrics`; everything else uses the
//! no-op implementation.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording cache metrics.
    pub enum ObservationCacheMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "observation cache metrics exporter failed: {message}",
    }
}

/// Metrics recording port for cache lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObservationCacheMetrics: Send + Sync {
    /// A lookup was served from the cache.
    async fn record_hit(&self) -> Result<(), ObservationCacheMetricsError>;

    /// A lookup fell through to the stores.
    async fn record_miss(&self) -> Result<(), ObservationCacheMetricsError>;

    /// A cache read or write failed and was treated as a miss.
    async fn record_error(&self) -> Result<(), ObservationCacheMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObservationCacheMetrics;

#[async_trait]
impl ObservationCacheMetrics for NoOpObservationCacheMetrics {
    async fn record_hit(&self) -> Result<(), ObservationCacheMetricsError> {
        Ok(())
    }

    async fn record_miss(&self) -> Result<(), ObservationCacheMetricsError> {
        Ok(())
    }

    async fn record_error(&self) -> Result<(), ObservationCacheMetricsError> {
        Ok(())
    }
}
