use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::{AppState, format_uptime};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub uptime: String,
    pub cache_size: u64,
    pub cache_hit_rate: f64,
    /// Rate limit windows currently tracked.
    pub rate_limited_ips: usize,
    pub maintenance: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = state.uptime();

    Json(HealthResponse {
        status: "UP",
        version: crate::version(),
        uptime_seconds: uptime.as_secs(),
        uptime: format_uptime(uptime),
        cache_size: state.cache().entry_count(),
        cache_hit_rate: state.cache().metrics().hit_rate(),
        rate_limited_ips: state.limiter().tracked(),
        maintenance: state.settings().snapshot().maintenance.enabled,
    })
}
