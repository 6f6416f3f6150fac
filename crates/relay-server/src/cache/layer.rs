//! Middleware serving GET responses from the cache.

use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::cache::{CacheKey, CachedResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Largest body the cache will capture.
const MAX_CAPTURE_BYTES: usize = 4 * 1024 * 1024;

/// Returns a cached body on hit; on miss runs the handler and captures
/// successful JSON responses. Non-GET requests bypass the cache.
pub async fn cache_response(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let cache = state.cache();
    let key = CacheKey::from_uri(request.uri());

    if let Some(hit) = cache.get(&key).await {
        debug!(key = %key, "Cache hit");
        return (
            hit.status,
            [(header::CONTENT_TYPE, "application/json")],
            hit.body.clone(),
        )
            .into_response();
    }

    let response = next.run(request).await;
    if !response.status().is_success() || !is_json(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_CAPTURE_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to buffer response for caching");
            return ApiError::Internal("Failed to read response body".to_string()).into_response();
        },
    };

    if let Some(captured) = CachedResponse::capture(parts.status, &bytes) {
        cache.insert(key, captured).await;
    }

    Response::from_parts(parts, Body::from(bytes))
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}
