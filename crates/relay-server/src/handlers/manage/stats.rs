//! Request statistics.

use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use super::{AdminResponse, authorize};
use crate::error::ApiResult;
use crate::extractors::Params;
use crate::state::{AppState, format_uptime};
use crate::stats::{DetailedStats, EndpointCount, TimeRange, TimeRangeLabel};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub status: &'static str,
    pub uptime: String,
    pub uptime_seconds: u64,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCounts {
    pub total: u64,
    pub in_period: u64,
    pub period: TimeRangeLabel,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub server: ServerInfo,
    pub requests: RequestCounts,
    pub top_endpoints: Vec<EndpointCount>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutcome {
    pub previous_total: u64,
    pub reset_at: DateTime<Utc>,
}

/// `GET /manage/stats?time=1h`. Unknown periods fall back to 30 minutes.
pub async fn summary(State(state): State<AppState>, params: Params) -> AdminResponse<StatsOverview> {
    let range = TimeRange::parse_or_default(params.get("time").as_deref());
    let summary = state.stats().summary(range);
    let uptime = state.uptime();

    AdminResponse::new(
        "Stats retrieved successfully",
        StatsOverview {
            server: ServerInfo {
                status: "online",
                uptime: format_uptime(uptime),
                uptime_seconds: uptime.as_secs(),
                start_time: state.started_at(),
            },
            requests: RequestCounts {
                total: summary.total,
                in_period: summary.in_period,
                period: summary.period,
            },
            top_endpoints: summary.top_endpoints,
        },
    )
}

/// `POST /manage/stats/reset`.
#[instrument(skip_all)]
pub async fn reset(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<AdminResponse<ResetOutcome>> {
    authorize(&state, &params)?;

    let previous_total = state.stats().reset();
    info!(previous_total, "Request statistics reset");

    Ok(AdminResponse::new(
        "Stats reset successfully",
        ResetOutcome {
            previous_total,
            reset_at: Utc::now(),
        },
    ))
}

/// `GET /manage/stats/detailed`.
#[instrument(skip_all)]
pub async fn detailed(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<AdminResponse<DetailedStats>> {
    authorize(&state, &params)?;
    Ok(AdminResponse::new(
        "Detailed stats retrieved successfully",
        state.stats().detailed(),
    ))
}
