//! Maintenance mode switch.

use axum::extract::State;
use relay_core::DEFAULT_MAINTENANCE_MESSAGE;
use serde::Serialize;
use tracing::{info, instrument};

use super::{AdminResponse, authorize};
use crate::error::{ApiError, ApiResult};
use crate::extractors::Params;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MaintenanceState {
    pub enabled: bool,
    pub message: String,
}

/// `PUT /manage/maintenance` with `action` = `on` | `off` and an optional
/// `message`. Turning it off clears the stored message.
#[instrument(skip_all)]
pub async fn set_maintenance(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<AdminResponse<MaintenanceState>> {
    authorize(&state, &params)?;

    let enabled = match params.get("action").as_deref() {
        Some("on") => true,
        Some("off") => false,
        _ => return Err(ApiError::bad_request("action must be 'on' or 'off'")),
    };
    let message = params.get("message");

    let settings = state.settings().update(|s| -> Result<(), ApiError> {
        s.maintenance.enabled = enabled;
        s.maintenance.message = if enabled {
            message.unwrap_or_else(|| DEFAULT_MAINTENANCE_MESSAGE.to_string())
        } else {
            String::new()
        };
        Ok(())
    })?;

    info!(enabled, "Maintenance mode changed");

    Ok(AdminResponse::new(
        format!(
            "Maintenance mode {} successfully",
            if enabled { "enabled" } else { "disabled" }
        ),
        MaintenanceState {
            enabled,
            message: settings.maintenance.message.clone(),
        },
    ))
}

/// `GET /manage/maintenance/status`. No secret required.
pub async fn maintenance_status(State(state): State<AppState>) -> AdminResponse<MaintenanceState> {
    let settings = state.settings().snapshot();
    AdminResponse::new(
        "Maintenance status retrieved successfully",
        MaintenanceState {
            enabled: settings.maintenance.enabled,
            message: settings.maintenance.display_message().to_string(),
        },
    )
}
