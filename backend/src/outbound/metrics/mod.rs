//! Outbound adapters for metrics exporting.
//!
//! Feature-gated behind `metrics`.

mod prometheus_cache;

pub use prometheus_cache::PrometheusObservationCacheMetrics;
