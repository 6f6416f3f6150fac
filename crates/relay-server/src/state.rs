//! Application state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use relay_sources::{HttpClient, SourceError, Sources};

use crate::cache::{CacheConfig, ResponseCache};
use crate::config::ServerConfig;
use crate::gate::FixedWindowLimiter;
use crate::settings_store::SettingsStore;
use crate::stats::RequestStats;

/// Application state shared across all handlers and gates.
///
/// Everything is built once at startup; clones share the same instances.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: ServerConfig,
    settings: Arc<SettingsStore>,
    limiter: Arc<FixedWindowLimiter>,
    cache: ResponseCache,
    stats: Arc<RequestStats>,
    sources: Sources,
    started: Instant,
    started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates the state. Cache sizing is taken from the current settings
    /// snapshot and stays fixed afterwards.
    pub fn new(config: ServerConfig, settings: Arc<SettingsStore>, sources: Sources) -> Self {
        let cache = ResponseCache::new(CacheConfig::from(settings.snapshot().cache));

        Self {
            inner: Arc::new(Inner {
                config,
                settings,
                limiter: Arc::new(FixedWindowLimiter::new()),
                cache,
                stats: Arc::new(RequestStats::new()),
                sources,
                started: Instant::now(),
                started_at: Utc::now(),
            }),
        }
    }

    /// Loads the settings file and builds every integration client.
    pub fn from_config(config: ServerConfig) -> Result<Self, SourceError> {
        let settings = Arc::new(SettingsStore::load(&config.settings_path));
        let http = HttpClient::new(&config.client_config())?;
        let sources = Sources::new(http, &config.upstream_hosts());
        Ok(Self::new(config, settings, sources))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.inner.settings
    }

    pub fn limiter(&self) -> &Arc<FixedWindowLimiter> {
        &self.inner.limiter
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }

    pub fn stats(&self) -> &Arc<RequestStats> {
        &self.inner.stats
    }

    pub fn sources(&self) -> &Sources {
        &self.inner.sources
    }

    pub fn uptime(&self) -> Duration {
        self.inner.started.elapsed()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.inner.started_at
    }
}

/// Formats a duration as `1h 2m 3s`.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_format() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0h 0m 0s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h 2m 3s");
        assert_eq!(format_uptime(Duration::from_secs(90_000)), "25h 0m 0s");
    }
}
