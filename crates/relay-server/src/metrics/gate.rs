//! Request gate metrics.

use metrics::counter;

pub fn register_gate_metrics() {
    metrics::describe_counter!(
        "relay_rate_limited_total",
        "Requests rejected by the rate limiter"
    );
    metrics::describe_counter!(
        "relay_gate_rejections_total",
        "Requests rejected by the API key or maintenance gate"
    );
}

/// Counts a 429 answer. `scope` is `ip` or `key`.
pub fn record_rate_limited(scope: &'static str) {
    counter!("relay_rate_limited_total", "scope" => scope).increment(1);
}

/// Counts a request stopped by the API key or maintenance gate.
pub fn record_rejection(gate: &'static str, status: u16) {
    counter!(
        "relay_gate_rejections_total",
        "gate" => gate,
        "status" => status.to_string()
    )
    .increment(1);
}
