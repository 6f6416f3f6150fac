//! API key gate for integration routes.

use std::collections::HashMap;

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use relay_core::KeyLookup;
use tracing::debug;

use crate::error::ApiError;
use crate::metrics::gate as gate_metrics;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_PARAM: &str = "apikey";

/// Key presented by the client: the `x-api-key` header, else the `apikey`
/// query parameter. Blank values count as absent.
pub fn presented_key<B>(request: &axum::http::Request<B>) -> Option<String> {
    let from_header = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from);

    from_header.or_else(|| {
        Query::<HashMap<String, String>>::try_from_uri(request.uri())
            .ok()
            .and_then(|Query(mut params)| params.remove(API_KEY_PARAM))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Rejects integration requests without a usable key while
/// `apiSettings.requireApikey` is on.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let settings = state.settings().snapshot();
    if !settings.api_settings.require_apikey {
        return Ok(next.run(request).await);
    }

    let Some(key) = presented_key(&request) else {
        gate_metrics::record_rejection("apikey", 401);
        return Err(ApiError::Unauthorized(
            "API key is required. Provide it in the x-api-key header or the apikey query parameter."
                .to_string(),
        ));
    };

    match settings.lookup_key(&key) {
        KeyLookup::Valid(entry) => {
            debug!(key_name = %entry.name, category = %entry.category, "API key accepted");
            Ok(next.run(request).await)
        },
        KeyLookup::Disabled => {
            gate_metrics::record_rejection("apikey", 403);
            Err(ApiError::forbidden("API key is disabled"))
        },
        KeyLookup::Unknown => {
            gate_metrics::record_rejection("apikey", 403);
            Err(ApiError::forbidden("Invalid API key"))
        },
    }
}
