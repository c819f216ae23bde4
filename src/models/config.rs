use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::page::DEFAULT_ITEMS_PER_PAGE;

/// Configuration options specific to the Backoffice service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Base URL of the backend REST API, e.g. `https://api.example.com/api`.
    pub api_base_url: String,
    /// Per-request timeout towards the backend, in seconds.
    pub request_timeout_secs: u64,
    /// Rows per page, mirrors the backend paginator.
    pub per_page: usize,
    /// Quiet period applied to live search input, in milliseconds.
    pub debounce_ms: u64,
    /// Lifetime of a cached listing page, in seconds.
    pub cache_stale_secs: u64,
    /// Session cookie signing key, at least 64 bytes. A random key is
    /// generated when unset, which drops sessions across restarts.
    pub session_key: Option<String>,
}

impl ServerConfig {
    /// Loads `backoffice.yaml` and applies `BACKOFFICE_*` environment
    /// overrides. `api_base_url` has no default and must be present in
    /// one of the two sources.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("request_timeout_secs", 30)?
            .set_default("per_page", DEFAULT_ITEMS_PER_PAGE as u64)?
            .set_default("debounce_ms", 500)?
            .set_default("cache_stale_secs", 300)?
            .add_source(File::with_name("backoffice").required(false))
            .add_source(Environment::with_prefix("BACKOFFICE"))
            .build()?
            .try_deserialize()
    }
}
