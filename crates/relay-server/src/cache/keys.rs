//! Cache key generation.

use std::fmt;

use axum::http::Uri;

/// Cache key: the exact request path plus query string.
///
/// `/search/youtube?q=a&limit=2` and `/search/youtube?limit=2&q=a` are
/// different keys; no normalisation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(path_and_query: impl Into<String>) -> Self {
        Self(path_and_query.into())
    }

    pub fn from_uri(uri: &Uri) -> Self {
        let key = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());
        Self(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
