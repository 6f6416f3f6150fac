//! Admin API under `/manage`.
//!
//! Mutating calls require the `admin_key` parameter (query or JSON body) to
//! match the secret from the server configuration. Without a configured
//! secret every guarded call is refused.

pub mod apikey;
pub mod cache;
pub mod maintenance;
pub mod stats;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::extractors::Params;
use crate::metrics::gate as gate_metrics;
use crate::state::AppState;

pub const ADMIN_KEY_PARAM: &str = "admin_key";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/manage/maintenance", put(maintenance::set_maintenance))
        .route(
            "/manage/maintenance/status",
            get(maintenance::maintenance_status),
        )
        .route("/manage/apikey/add", post(apikey::add_key))
        .route("/manage/apikey/delete", delete(apikey::delete_key))
        .route("/manage/apikey/list", get(apikey::list_keys))
        .route("/manage/apikey/toggle", put(apikey::toggle_requirement))
        .route("/manage/apikey/update", put(apikey::update_key))
        .route("/manage/stats", get(stats::summary))
        .route("/manage/stats/reset", post(stats::reset))
        .route("/manage/stats/detailed", get(stats::detailed))
        .route("/manage/cache", delete(cache::purge))
}

/// Checks the admin secret carried by `params`.
pub fn authorize(state: &AppState, params: &Params) -> Result<(), ApiError> {
    let presented = params.get(ADMIN_KEY_PARAM);
    match (state.config().admin_key(), presented.as_deref()) {
        (Some(expected), Some(given)) if expected == given => Ok(()),
        (None, _) => {
            warn!("Admin call refused: no admin key configured");
            gate_metrics::record_rejection("admin", 403);
            Err(ApiError::forbidden("Invalid admin key"))
        },
        _ => {
            gate_metrics::record_rejection("admin", 403);
            Err(ApiError::forbidden("Invalid admin key"))
        },
    }
}

/// `{status, message, data}` shape of admin responses.
#[derive(Debug, Serialize)]
pub struct AdminResponse<T> {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    pub data: T,
}

impl<T: Serialize> AdminResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: message.into(),
            total: None,
            data,
        }
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for AdminResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
