//! Cache invalidation with glob patterns.

use glob::{Pattern, PatternError};
use serde::Serialize;
use tracing::info;

use crate::cache::{CacheKey, ResponseCache};

/// Outcome of an invalidation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidationResult {
    /// Number of entries removed.
    pub count: u64,
    /// Pattern applied, `None` for a full purge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ResponseCache {
    /// Removes entries whose key (`path?query`) matches a glob pattern.
    ///
    /// `*` matches any run of characters, including `/` and `?`, so
    /// `/search/*` purges every cached search.
    ///
    /// ```no_run
    /// # use relay_server::cache::{CacheConfig, ResponseCache};
    /// # #[tokio::main]
    /// # async fn main() {
    /// let cache = ResponseCache::new(CacheConfig::default());
    /// let result = cache.invalidate_by_pattern("/search/youtube*").await.unwrap();
    /// println!("Invalidated {} entries", result.count);
    /// # }
    /// ```
    pub async fn invalidate_by_pattern(
        &self,
        pattern_str: &str,
    ) -> Result<InvalidationResult, PatternError> {
        let pattern = Pattern::new(pattern_str)?;

        let matching: Vec<CacheKey> = self
            .iter()
            .filter(|(key, _)| pattern.matches(key.as_str()))
            .map(|(key, _)| CacheKey::clone(&key))
            .collect();

        let count = matching.len() as u64;
        for key in matching {
            self.invalidate(&key).await;
        }
        self.sync().await;

        info!(pattern = %pattern_str, count, "Cache entries invalidated by pattern");

        Ok(InvalidationResult {
            count,
            pattern: Some(pattern_str.to_string()),
        })
    }

    /// Removes everything.
    pub async fn purge(&self) -> InvalidationResult {
        let count = self.invalidate_all().await;
        info!(count, "All cache entries invalidated");
        InvalidationResult {
            count,
            pattern: None,
        }
    }
}
