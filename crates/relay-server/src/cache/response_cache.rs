//! Response cache using Moka.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use bytes::Bytes;
use moka::future::Cache;
use moka::notification::RemovalCause;
use moka::policy::EvictionPolicy;
use relay_core::CacheSettings;

use crate::cache::keys::CacheKey;
use crate::metrics::CacheMetrics;

/// Cache sizing, fixed for the lifetime of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheSettings::default().into()
    }
}

impl From<CacheSettings> for CacheConfig {
    fn from(settings: CacheSettings) -> Self {
        Self {
            ttl: Duration::from_millis(settings.ttl.max(1)),
            max_capacity: settings.max_size.max(1),
        }
    }
}

/// A captured successful JSON response, body already marked `cached: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl CachedResponse {
    /// Captures `body` when it is a JSON object, adding `cached: true`.
    ///
    /// The marker is spliced in before the closing brace so every other byte
    /// of the original body, key order included, is served unchanged.
    pub fn capture(status: StatusCode, body: &[u8]) -> Option<Self> {
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(body).ok()?;
        if object.contains_key("cached") {
            return Some(Self {
                status,
                body: Bytes::copy_from_slice(body),
            });
        }

        let trimmed = body.trim_ascii_end();
        let head = trimmed.strip_suffix(b"}")?;
        let mut marked = Vec::with_capacity(trimmed.len() + 16);
        marked.extend_from_slice(head);
        if !object.is_empty() {
            marked.push(b',');
        }
        marked.extend_from_slice(br#""cached":true}"#);

        Some(Self {
            status,
            body: Bytes::from(marked),
        })
    }
}

/// Response cache keyed by path and query. Thread-safe and cheap to clone.
#[derive(Clone)]
pub struct ResponseCache {
    inner: Cache<CacheKey, Arc<CachedResponse>>,
    metrics: CacheMetrics,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        let metrics = CacheMetrics::new();

        let eviction_metrics = metrics.clone();
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    RemovalCause::Expired => "ttl",
                    RemovalCause::Size => "capacity",
                    RemovalCause::Explicit => "manual",
                    RemovalCause::Replaced => "replaced",
                };
                eviction_metrics.record_eviction(reason);
            })
            .build();

        Self {
            inner,
            metrics,
            config,
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<CachedResponse>> {
        let result = self.inner.get(key).await;

        if result.is_some() {
            self.metrics.record_hit();
        } else {
            self.metrics.record_miss();
        }

        result
    }

    pub async fn insert(&self, key: CacheKey, value: CachedResponse) {
        self.inner.insert(key, Arc::new(value)).await;
        self.metrics.update_entry_count(self.inner.entry_count());
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }

    /// Drops every entry and returns how many there were.
    pub async fn invalidate_all(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        let count = self.inner.entry_count();
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
        self.metrics.update_entry_count(0);
        count
    }

    /// Approximate number of entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Snapshot iteration; entries may change meanwhile.
    pub fn iter(&self) -> impl Iterator<Item = (Arc<CacheKey>, Arc<CachedResponse>)> + '_ {
        self.inner.iter()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Applies pending evictions so counts are exact.
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
        self.metrics.update_entry_count(self.inner.entry_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> CachedResponse {
        CachedResponse::capture(StatusCode::OK, body.as_bytes()).unwrap()
    }

    #[test]
    fn capture_marks_body_as_cached() {
        let cached = response(r#"{"status":true,"code":200,"result":[]}"#);
        let value: serde_json::Value = serde_json::from_slice(&cached.body).unwrap();

        assert_eq!(value["cached"], true);
        assert_eq!(value["code"], 200);
    }

    #[test]
    fn capture_skips_non_objects() {
        assert!(CachedResponse::capture(StatusCode::OK, b"[1,2]").is_none());
        assert!(CachedResponse::capture(StatusCode::OK, b"not json").is_none());
    }

    #[test]
    fn config_from_settings_uses_milliseconds() {
        let config = CacheConfig::from(CacheSettings {
            ttl: 1500,
            max_size: 10,
        });
        assert_eq!(config.ttl, Duration::from_millis(1500));
        assert_eq!(config.max_capacity, 10);
    }

    #[tokio::test]
    async fn insert_and_get() {
        let cache = ResponseCache::new(CacheConfig::default());
        let key = CacheKey::new("/search/lyrics?q=yellow");

        cache.insert(key.clone(), response(r#"{"ok":1}"#)).await;

        assert!(cache.get(&key).await.is_some());
        assert_eq!(cache.metrics().hits(), 1);
    }

    #[tokio::test]
    async fn miss_is_recorded() {
        let cache = ResponseCache::new(CacheConfig::default());

        assert!(cache.get(&CacheKey::new("/nope")).await.is_none());
        assert_eq!(cache.metrics().misses(), 1);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = ResponseCache::new(CacheConfig {
            ttl: Duration::from_millis(50),
            max_capacity: 10,
        });
        let key = CacheKey::new("/api/r/quotesanime");
        cache.insert(key.clone(), response("{}")).await;

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(cache.get(&key).await.is_none());
    }

    #[test]
    fn capture_keeps_original_bytes() {
        let body = br#"{"status":true,"code":200,"result":{"z":1,"a":{"y":[2,1],"b":null}}}"#;
        let cached = CachedResponse::capture(StatusCode::OK, body).unwrap();

        assert_eq!(
            &cached.body[..],
            &br#"{"status":true,"code":200,"result":{"z":1,"a":{"y":[2,1],"b":null}},"cached":true}"#[..]
        );
    }

    #[test]
    fn capture_handles_empty_objects_and_trailing_whitespace() {
        assert_eq!(&response("{}").body[..], &br#"{"cached":true}"#[..]);
        assert_eq!(&response("{ }\n").body[..], &br#"{ "cached":true}"#[..]);
        assert_eq!(&response("{\"a\":1}\n").body[..], &br#"{"a":1,"cached":true}"#[..]);
    }

    #[test]
    fn capture_leaves_existing_marker_alone() {
        let cached = response(r#"{"cached":false,"a":1}"#);
        assert_eq!(&cached.body[..], &br#"{"cached":false,"a":1}"#[..]);
    }

    fn bounded(max_capacity: u64) -> ResponseCache {
        ResponseCache::new(CacheConfig {
            ttl: Duration::from_secs(60),
            max_capacity,
        })
    }

    fn key(i: u64) -> CacheKey {
        CacheKey::new(format!("/search/lyrics?q={}", i))
    }

    #[tokio::test]
    async fn capacity_evicts_down_to_max_and_admits_newest() {
        let cache = bounded(3);

        for i in 0..4 {
            cache.insert(key(i), response("{}")).await;
        }
        cache.sync().await;

        assert_eq!(cache.entry_count(), 3);
        assert!(cache.get(&key(3)).await.is_some());
        assert!(cache.get(&key(0)).await.is_none());
    }

    #[tokio::test]
    async fn newest_entry_is_admitted_after_hot_reads() {
        let cache = bounded(3);

        for i in 0..3 {
            cache.insert(key(i), response("{}")).await;
        }
        for _ in 0..5 {
            for i in 0..3 {
                assert!(cache.get(&key(i)).await.is_some());
            }
        }
        cache.insert(key(3), response("{}")).await;
        cache.sync().await;

        assert_eq!(cache.entry_count(), 3);
        assert!(cache.get(&key(3)).await.is_some());
    }

    #[tokio::test]
    async fn reads_refresh_recency() {
        let cache = bounded(3);

        for i in 0..3 {
            cache.insert(key(i), response("{}")).await;
        }
        cache.sync().await;
        assert!(cache.get(&key(0)).await.is_some());
        cache.sync().await;
        cache.insert(key(3), response("{}")).await;
        cache.sync().await;

        assert!(cache.get(&key(0)).await.is_some());
        assert!(cache.get(&key(1)).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_all_reports_count() {
        let cache = ResponseCache::new(CacheConfig::default());
        for i in 0..4 {
            cache
                .insert(CacheKey::new(format!("/a?{}", i)), response("{}"))
                .await;
        }

        assert_eq!(cache.invalidate_all().await, 4);
        assert!(cache.get(&CacheKey::new("/a?0")).await.is_none());
    }
}
