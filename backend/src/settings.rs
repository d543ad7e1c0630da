//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MARINE_*` environment variables and an
//! optional config file, in OrthoConfig's usual precedence order.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Invalid configuration values detected after loading.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("cache TTL must be at least one second")]
    ZeroCacheTtl,
    #[error("database pool must allow at least one connection")]
    ZeroPoolSize,
}

/// Process configuration for the marine backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARINE")]
pub struct AppSettings {
    /// Relational store (users, files, elements).
    pub database_url: String,
    /// Observation store.
    pub observations_database_url: String,
    /// Query cache; caching is disabled when absent.
    pub redis_url: Option<String>,
    /// Listener address, `host:port`.
    pub bind_addr: Option<String>,
    /// Maximum connections per database pool.
    pub db_max_connections: Option<u32>,
    /// Lifetime of cached query results.
    pub cache_ttl_seconds: Option<u64>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
}

impl AppSettings {
    /// Parse the listener address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn cache_ttl(&self) -> Result<Duration, SettingsError> {
        match self.cache_ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECONDS) {
            0 => Err(SettingsError::ZeroCacheTtl),
            seconds => Ok(Duration::from_secs(seconds)),
        }
    }

    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::ZeroPoolSize),
            size => Ok(size),
        }
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}
