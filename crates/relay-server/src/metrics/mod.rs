//! Prometheus metrics for the gateway.

pub mod cache;
pub mod gate;
pub mod http;
pub mod setup;

pub use cache::CacheMetrics;
pub use setup::init_metrics;
