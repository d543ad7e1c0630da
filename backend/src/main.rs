//! Backend entry-point: loads configuration, migrates both databases and
//! serves the REST API.

mod server;

use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marine_backend::inbound::http::health::HealthState;
use marine_backend::outbound::cache::RedisObservationCache;
use marine_backend::outbound::persistence::{
    DbPool, OBSERVATION_MIGRATIONS, PoolConfig, RELATIONAL_MIGRATIONS, run_migrations,
};
use marine_backend::settings::AppSettings;
use server::{ServerConfig, StorePools, create_server};

const POOL_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);
const REDIS_POOL_SIZE: u32 = 8;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let key = load_session_key(&settings.session_key_file(), settings.session_allow_ephemeral)?;

    run_migrations(settings.database_url.clone(), RELATIONAL_MIGRATIONS)
        .await
        .wrap_err("relational store migrations failed")?;
    run_migrations(
        settings.observations_database_url.clone(),
        OBSERVATION_MIGRATIONS,
    )
    .await
    .wrap_err("observation store migrations failed")?;

    let stores = build_store_pools(&settings).await?;
    let cache = build_cache(&settings).await?;
    let bind_addr = settings.bind_addr()?;

    let config = ServerConfig::new(key, settings.cookie_secure, SameSite::Lax, bind_addr)
        .with_stores(stores)
        .with_cache(cache)
        .with_cache_ttl(settings.cache_ttl()?);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("marine")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) if cfg!(debug_assertions) || allow_ephemeral => {
            warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(e) => Err(e)
            .wrap_err_with(|| format!("failed to read session key at {}", path.display())),
    }
}

async fn build_store_pools(settings: &AppSettings) -> Result<StorePools> {
    let max_size = settings.db_max_connections()?;
    let pool = |url: &str| {
        PoolConfig::new(url)
            .with_max_size(max_size)
            .with_connection_timeout(POOL_CHECKOUT_TIMEOUT)
    };
    let relational = DbPool::new(pool(&settings.database_url))
        .await
        .wrap_err("failed to build relational store pool")?;
    let observations = DbPool::new(pool(&settings.observations_database_url))
        .await
        .wrap_err("failed to build observation store pool")?;
    Ok(StorePools::new(relational, observations))
}

async fn build_cache(settings: &AppSettings) -> Result<Option<RedisObservationCache>> {
    let Some(url) = settings.redis_url.as_deref() else {
        info!("no redis url configured; query caching disabled");
        return Ok(None);
    };
    let cache = RedisObservationCache::connect(url, REDIS_POOL_SIZE, POOL_CHECKOUT_TIMEOUT)
        .await
        .wrap_err("failed to configure redis cache")?;
    Ok(Some(cache))
}

/// Build Prometheus middleware, logging and continuing without it on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<E: std::fmt::Display>(
    build: impl FnOnce() -> std::result::Result<PrometheusMetrics, E>,
) -> Option<PrometheusMetrics> {
    build()
        .inspect_err(|e| warn!(error = %e, "metrics disabled: prometheus setup failed"))
        .ok()
}
