//! Metrics setup and initialization.

use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

/// Installs the Prometheus recorder and returns the handle for `/metrics`.
///
/// Histogram buckets are in seconds and reach up to a minute, since
/// integrations that poll upstream jobs can take that long.
pub fn init_metrics() -> PrometheusHandle {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .set_buckets(&[
            0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            60.0,
        ])
        .expect("failed to set histogram buckets")
        .install_recorder()
        .expect("failed to install metrics recorder");

    super::http::register_http_metrics();
    super::cache::register_cache_metrics();
    super::gate::register_gate_metrics();

    info!("Metrics system initialized");
    handle
}
