//! Request statistics middleware.

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Paths left out of the statistics.
const UNCOUNTED: [&str; 2] = ["/health", "/metrics"];

/// Counts every request against its route template.
///
/// Unmatched requests are grouped under `unmatched` so probing for random
/// paths cannot grow the endpoint table without bound.
pub async fn record_request(
    State(state): State<AppState>,
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !UNCOUNTED.contains(&path) {
        let endpoint = matched_path
            .as_ref()
            .map(MatchedPath::as_str)
            .unwrap_or("unmatched");
        state.stats().record(endpoint);
    }

    next.run(request).await
}
