//! Response cache.
//!
//! Successful JSON responses to GET requests are kept in a Moka cache keyed
//! by path and query, with a fixed TTL and capacity taken from the settings
//! at startup. Entries can be purged through the admin API, all at once or
//! by glob pattern.

pub mod invalidation;
pub mod keys;
pub mod layer;
pub mod response_cache;

pub use invalidation::InvalidationResult;
pub use keys::CacheKey;
pub use layer::cache_response;
pub use response_cache::{CacheConfig, CachedResponse, ResponseCache};
