//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use marine_backend::domain::DEFAULT_CACHE_TTL;
use marine_backend::outbound::cache::RedisObservationCache;
use marine_backend::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Connection pools for the two databases.
#[derive(Clone)]
pub struct StorePools {
    pub(crate) relational: DbPool,
    pub(crate) observations: DbPool,
}

impl StorePools {
    pub fn new(relational: DbPool, observations: DbPool) -> Self {
        Self {
            relational,
            observations,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) stores: Option<StorePools>,
    pub(crate) cache: Option<RedisObservationCache>,
    pub(crate) cache_ttl: Duration,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Session and listener settings; stores default to fixtures and the
    /// cache to disabled until attached.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            stores: None,
            cache: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach the database pools backing the repositories.
    #[must_use]
    pub fn with_stores(mut self, stores: StorePools) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Enable query result caching in Redis.
    #[must_use]
    pub fn with_cache(mut self, cache: Option<RedisObservationCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
