//! Prometheus adapter for observation cache metrics.
//!
//! Registers one counter with the provided registry; the server exposes it
//! on `/metrics` alongside the HTTP metrics from `actix-web-prom`.

use async_trait::async_trait;
use prometheus::{CounterVec, Opts, Registry};

use crate::domain::ports::{ObservationCacheMetrics, ObservationCacheMetricsError};

/// Prometheus-backed observation cache metrics recorder.
///
/// # Metric
///
/// - **Name**: `marine_observation_cache_requests_total`
/// - **Type**: Counter
/// - **Labels**:
///   - `outcome`: `hit`, `miss`, or `error`
pub struct PrometheusObservationCacheMetrics {
    requests_total: CounterVec,
}

impl PrometheusObservationCacheMetrics {
    /// Create and register metrics with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = CounterVec::new(
            Opts::new(
                "marine_observation_cache_requests_total",
                "Observation query cache lookups by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;
        Ok(Self { requests_total })
    }

    fn record(&self, outcome: &str) {
        self.requests_total.with_label_values(&[outcome]).inc();
    }
}

#[async_trait]
impl ObservationCacheMetrics for PrometheusObservationCacheMetrics {
    async fn record_hit(&self) -> Result<(), ObservationCacheMetricsError> {
        self.record("hit");
        Ok(())
    }

    async fn record_miss(&self) -> Result<(), ObservationCacheMetricsError> {
        self.record("miss");
        Ok(())
    }

    async fn record_error(&self) -> Result<(), ObservationCacheMetricsError> {
        self.record("error");
        Ok(())
    }
}
