//! Response cache metrics.

use metrics::{counter, gauge};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Describes the cache metrics. Called once from [`super::init_metrics`].
pub fn register_cache_metrics() {
    metrics::describe_counter!("relay_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("relay_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "relay_cache_evictions_total",
        "Total number of cache evictions"
    );
    metrics::describe_gauge!("relay_cache_entries", "Current number of entries in cache");
}

/// Cache metrics recorder.
///
/// Keeps local atomic counters next to the exported metrics so hit rate can
/// be reported without querying the recorder.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    evictions: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            evictions: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("relay_cache_hits_total").increment(1);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("relay_cache_misses_total").increment(1);
    }

    /// Records an eviction; `reason` is one of `ttl`, `capacity`, `manual`, `replaced`.
    pub fn record_eviction(&self, reason: &'static str) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
        counter!("relay_cache_evictions_total", "reason" => reason).increment(1);
    }

    pub fn update_entry_count(&self, count: u64) {
        gauge!("relay_cache_entries").set(count as f64);
    }

    /// Hit rate in `[0, 1]`, zero before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}
