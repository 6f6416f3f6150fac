//! API key management.

use axum::{extract::State, http::StatusCode, response::Response};
use chrono::{DateTime, Utc};
use relay_core::{ApiKeyEntry, KeyRateLimit};
use serde::Serialize;
use tracing::{info, instrument};

use super::{AdminResponse, authorize};
use crate::error::{ApiError, ApiResult};
use crate::extractors::Params;
use crate::state::AppState;

/// One key as shown to administrators.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyView {
    pub key: String,
    pub name: String,
    pub category: String,
    pub ratelimit: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl KeyView {
    fn new(key: &str, entry: &ApiKeyEntry) -> Self {
        Self {
            key: key.to_string(),
            name: entry.name.clone(),
            category: entry.category.clone(),
            ratelimit: entry.rate_limit.to_string(),
            active: entry.enabled,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementView {
    pub require_apikey: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedKey {
    pub key: String,
}

fn parse_rate_limit(raw: &str) -> Result<KeyRateLimit, ApiError> {
    raw.parse().map_err(ApiError::BadRequest)
}

/// `POST /manage/apikey/add`.
#[instrument(skip_all)]
pub async fn add_key(State(state): State<AppState>, params: Params) -> ApiResult<Response> {
    authorize(&state, &params)?;

    let (Some(key), Some(name), Some(category), Some(ratelimit)) = (
        params.get("key"),
        params.get("name"),
        params.get("category"),
        params.get("ratelimit"),
    ) else {
        return Err(ApiError::bad_request(
            "key, name, category, and ratelimit are required",
        ));
    };
    let rate_limit = parse_rate_limit(&ratelimit)?;

    let settings = state.settings().update(|s| -> Result<(), ApiError> {
        if s.api_settings.apikey.contains_key(&key) {
            return Err(ApiError::Conflict(format!("API key {} already exists", key)));
        }
        s.api_settings
            .apikey
            .insert(key.clone(), ApiKeyEntry::new(name, category, rate_limit));
        Ok(())
    })?;

    info!(category = %settings.api_settings.apikey[&key].category, "API key added");

    let view = KeyView::new(&key, &settings.api_settings.apikey[&key]);
    Ok(AdminResponse::new("API key added successfully", view).with_status(StatusCode::CREATED))
}

/// `DELETE /manage/apikey/delete`.
#[instrument(skip_all)]
pub async fn delete_key(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<AdminResponse<DeletedKey>> {
    authorize(&state, &params)?;
    let key = params
        .get("key")
        .ok_or_else(|| ApiError::bad_request("key is required"))?;

    state.settings().update(|s| -> Result<(), ApiError> {
        s.api_settings
            .apikey
            .shift_remove(&key)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("API key {} not found", key)))
    })?;

    info!("API key deleted");
    Ok(AdminResponse::new("API key deleted successfully", DeletedKey { key }))
}

/// `GET /manage/apikey/list`.
#[instrument(skip_all)]
pub async fn list_keys(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<AdminResponse<Vec<KeyView>>> {
    authorize(&state, &params)?;

    let settings = state.settings().snapshot();
    let keys: Vec<KeyView> = settings
        .api_settings
        .apikey
        .iter()
        .map(|(key, entry)| KeyView::new(key, entry))
        .collect();
    let total = keys.len();

    Ok(AdminResponse::new("API keys listed successfully", keys).with_total(total))
}

/// `PUT /manage/apikey/toggle` with `action` = `enable` | `disable`.
#[instrument(skip_all)]
pub async fn toggle_requirement(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<AdminResponse<RequirementView>> {
    authorize(&state, &params)?;

    let require = match params.get("action").as_deref() {
        Some("enable") => true,
        Some("disable") => false,
        _ => {
            return Err(ApiError::bad_request(
                "action must be 'enable' or 'disable'",
            ));
        },
    };

    state.settings().update(|s| -> Result<(), ApiError> {
        s.api_settings.require_apikey = require;
        Ok(())
    })?;

    info!(require, "API key requirement changed");
    Ok(AdminResponse::new(
        format!(
            "API key requirement {} successfully",
            if require { "enabled" } else { "disabled" }
        ),
        RequirementView {
            require_apikey: require,
        },
    ))
}

/// `PUT /manage/apikey/update` with optional `new_name`, `new_category`
/// and `new_ratelimit`. Absent fields keep their value.
#[instrument(skip_all)]
pub async fn update_key(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<AdminResponse<KeyView>> {
    authorize(&state, &params)?;
    let key = params
        .get("key")
        .ok_or_else(|| ApiError::bad_request("key is required"))?;

    let new_name = params.get("new_name");
    let new_category = params.get("new_category");
    let new_rate_limit = params
        .get("new_ratelimit")
        .map(|raw| parse_rate_limit(&raw))
        .transpose()?;

    let settings = state.settings().update(|s| -> Result<(), ApiError> {
        let entry = s
            .api_settings
            .apikey
            .get_mut(&key)
            .ok_or_else(|| ApiError::not_found(format!("API key {} not found", key)))?;
        if let Some(name) = new_name {
            entry.name = name;
        }
        if let Some(category) = new_category {
            entry.category = category;
        }
        if let Some(rate_limit) = new_rate_limit {
            entry.rate_limit = rate_limit;
        }
        Ok(())
    })?;

    info!("API key updated");
    let view = KeyView::new(&key, &settings.api_settings.apikey[&key]);
    Ok(AdminResponse::new("API key updated successfully", view))
}
