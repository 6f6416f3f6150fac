//! Request gates: maintenance mode, rate limiting and API keys.
//!
//! All three read the current settings snapshot and nothing else; the only
//! state they touch is the in-memory rate limit counters.

mod apikey;
mod client_ip;
mod maintenance;
mod rate_limit;

pub use apikey::{presented_key, require_api_key};
pub use client_ip::client_ip;
pub use maintenance::maintenance_gate;
pub use rate_limit::{Decision, FixedWindowLimiter};

use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use relay_core::{KeyLookup, KeyRateLimit};
use tracing::debug;

use crate::error::ApiError;
use crate::metrics::gate as gate_metrics;
use crate::state::AppState;

/// Paths that are never rate limited.
pub const RATE_LIMIT_EXEMPT: [&str; 2] = ["/health", "/metrics"];

/// Route prefixes served by upstream integrations.
pub const API_PREFIXES: [&str; 6] = [
    "/api/",
    "/downloader/",
    "/search/",
    "/random/",
    "/tools/",
    "/ai/",
];

/// Returns true for integration routes.
pub fn is_api_path(path: &str) -> bool {
    API_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Fixed-window rate limiting.
///
/// Requests presenting a valid API key are counted against the key's own
/// limit (or not at all for unlimited keys); everything else is counted per
/// client IP with the global limit.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if RATE_LIMIT_EXEMPT.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let settings = state.settings().snapshot();
    let window = Duration::from_millis(settings.rate_limit.window_ms);

    let (bucket, max, scope) = match presented_key(&request)
        .as_deref()
        .map(|key| (key, settings.lookup_key(key)))
    {
        Some((key, KeyLookup::Valid(entry))) => match entry.rate_limit {
            KeyRateLimit::Unlimited => return next.run(request).await,
            KeyRateLimit::Limited(max) => (format!("key:{}", key), max, "key"),
        },
        _ => (
            client_ip(&request, state.config().trust_proxy),
            settings.rate_limit.max_requests,
            "ip",
        ),
    };

    match state.limiter().check(&bucket, max, window) {
        Decision::Limited { retry_after, .. } => {
            debug!(bucket = %bucket, retry_after, "Rate limit exceeded");
            gate_metrics::record_rate_limited(scope);
            ApiError::RateLimited { retry_after }.into_response()
        },
        Decision::Allowed { limit, remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        },
    }
}
