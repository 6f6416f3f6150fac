//! Maintenance mode gate.

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use super::is_api_path;
use crate::metrics::gate as gate_metrics;
use crate::state::AppState;

/// Paths served even while maintenance mode is on.
const ALLOWED_PATHS: [&str; 4] = ["/health", "/settings", "/metrics", "/favicon.ico"];
const ALLOWED_PREFIXES: [&str; 2] = ["/manage/", "/assets/"];

fn is_allowed(path: &str) -> bool {
    ALLOWED_PATHS.contains(&path) || ALLOWED_PREFIXES.iter().any(|p| path.starts_with(p))
}

#[derive(Serialize)]
struct MaintenanceBody<'a> {
    status: bool,
    code: u16,
    maintenance: bool,
    result: MaintenanceResult<'a>,
}

#[derive(Serialize)]
struct MaintenanceResult<'a> {
    message: &'a str,
}

/// Answers 503 for every non allow-listed path while maintenance is on:
/// a JSON envelope for integration routes, an HTML page elsewhere.
pub async fn maintenance_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let settings = state.settings().snapshot();
    let path = request.uri().path();

    if !settings.maintenance.enabled || is_allowed(path) {
        return next.run(request).await;
    }

    gate_metrics::record_rejection("maintenance", 503);
    let message = settings.maintenance.display_message();

    if is_api_path(path) {
        let body = MaintenanceBody {
            status: false,
            code: 503,
            maintenance: true,
            result: MaintenanceResult { message },
        };
        (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(maintenance_page(&settings.name, message)),
        )
            .into_response()
    }
}

fn maintenance_page(name: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{name} - Maintenance</title>
<style>body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#0f172a;color:#e2e8f0;min-height:100vh;display:flex;align-items:center;justify-content:center;margin:0}}main{{text-align:center;padding:24px}}h1{{font-size:28px;margin-bottom:12px}}p{{color:#94a3b8}}</style>
</head>
<body>
<main>
<h1>{name} is under maintenance</h1>
<p>{message}</p>
</main>
</body>
</html>
"#,
        name = escape_html(name),
        message = escape_html(message),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
