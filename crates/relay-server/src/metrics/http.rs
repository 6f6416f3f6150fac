//! HTTP metrics middleware.

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use std::time::Instant;

/// Records a request counter and latency histogram for every request.
///
/// Unmatched requests are labelled `unmatched` so arbitrary paths cannot
/// blow up label cardinality.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = matched_path
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();

    counter!(
        "relay_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "relay_http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

pub fn register_http_metrics() {
    metrics::describe_counter!("relay_http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "relay_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    metrics::describe_counter!(
        "relay_upstream_errors_total",
        "Integration calls that failed, by service and status code"
    );
}

/// Counts a failed integration call.
pub fn record_upstream_error(service: &'static str, code: u16) {
    counter!(
        "relay_upstream_errors_total",
        "service" => service,
        "code" => code.to_string()
    )
    .increment(1);
}
