//! Builders wiring repositories, cache and metrics into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use marine_backend::domain::ports::{
    DisabledObservationCache, NoOpObservationCacheMetrics, ObservationCache,
    ObservationCacheMetrics,
};
use marine_backend::domain::{ObservationIngestService, ObservationQueryService, UploadsService};
use marine_backend::inbound::http::state::HttpState;
#[cfg(feature = "metrics")]
use marine_backend::outbound::metrics::PrometheusObservationCacheMetrics;
use marine_backend::outbound::persistence::{
    DieselElementRepository, DieselFileMetadataRepository, DieselObservationRepository,
};

use super::{ServerConfig, StorePools};

fn build_cache(config: &ServerConfig) -> Arc<dyn ObservationCache> {
    match &config.cache {
        Some(cache) => Arc::new(cache.clone()),
        None => Arc::new(DisabledObservationCache),
    }
}

/// Prometheus-backed cache counters when a registry is configured.
///
/// # Errors
/// Returns [`std::io::Error`] if the counter cannot be registered.
#[cfg(feature = "metrics")]
fn build_cache_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn ObservationCacheMetrics>> {
    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusObservationCacheMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("cache metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpObservationCacheMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn build_cache_metrics(
    _config: &ServerConfig,
) -> std::io::Result<Arc<dyn ObservationCacheMetrics>> {
    Ok(Arc::new(NoOpObservationCacheMetrics))
}

fn build_store_state(
    stores: &StorePools,
    cache: Arc<dyn ObservationCache>,
    metrics: Arc<dyn ObservationCacheMetrics>,
    config: &ServerConfig,
) -> HttpState {
    let observations = Arc::new(DieselObservationRepository::new(stores.observations.clone()));
    let files = Arc::new(DieselFileMetadataRepository::new(stores.relational.clone()));
    let elements = Arc::new(DieselElementRepository::new(stores.relational.clone()));

    let query = ObservationQueryService::new(observations.clone(), files.clone(), cache)
        .with_metrics(metrics)
        .with_ttl(config.cache_ttl);
    let ingest = ObservationIngestService::new(
        observations.clone(),
        files.clone(),
        elements.clone(),
        Arc::new(DefaultClock),
    );
    let uploads = UploadsService::new(observations, files, elements.clone());

    HttpState::new(
        Arc::new(query),
        Arc::new(ingest),
        Arc::new(uploads),
        elements,
    )
}

/// Build HTTP state from the configured stores, falling back to fixtures
/// when none are attached.
///
/// # Errors
/// Returns [`std::io::Error`] if metrics registration fails.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let state = match &config.stores {
        Some(stores) => {
            let cache = build_cache(config);
            let metrics = build_cache_metrics(config)?;
            build_store_state(stores, cache, metrics, config)
        }
        None => HttpState::fixtures(),
    };
    Ok(web::Data::new(state))
}
