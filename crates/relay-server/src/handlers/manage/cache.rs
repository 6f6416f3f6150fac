//! Cache invalidation.

use axum::extract::State;
use tracing::instrument;

use super::{AdminResponse, authorize};
use crate::cache::InvalidationResult;
use crate::error::{ApiError, ApiResult};
use crate::extractors::Params;
use crate::state::AppState;

/// `DELETE /manage/cache`, optionally restricted by a glob `pattern` over
/// cache keys (`/search/*`).
#[instrument(skip_all)]
pub async fn purge(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<AdminResponse<InvalidationResult>> {
    authorize(&state, &params)?;

    let result = match params.get("pattern") {
        Some(pattern) => state
            .cache()
            .invalidate_by_pattern(&pattern)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid pattern: {}", e)))?,
        None => state.cache().purge().await,
    };

    let message = match &result.pattern {
        Some(pattern) => format!(
            "Invalidated {} cache entries matching '{}'",
            result.count, pattern
        ),
        None => format!("Invalidated all {} cache entries", result.count),
    };
    Ok(AdminResponse::new(message, result))
}
