use std::any::Any;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
};

use crate::cache::cache_response;
use crate::error::ApiError;
use crate::gate::{maintenance_gate, rate_limit, require_api_key};
use crate::handlers::{
    health::health_check, manage, metrics::metrics_handler, settings::public_settings,
};
use crate::middleware::{LoggingLayer, RequestIdLayer, record_request};
use crate::routes;
use crate::state::AppState;
use crate::tasks;

/// Builds the full application router.
///
/// Layer order, outermost first: request id, logging, panic recovery, CORS,
/// body limit, HTTP metrics, statistics, maintenance, rate limit. Integration
/// routes additionally pass the API key gate and then the response cache.
pub fn create_router(state: AppState, prometheus_handle: Option<PrometheusHandle>) -> Router {
    let integrations = routes::router()
        .route_layer(middleware::from_fn_with_state(state.clone(), cache_response))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    let mut app = Router::new()
        .route("/health", get(health_check))
        .route("/settings", get(public_settings))
        .merge(manage::router())
        .merge(integrations)
        .fallback(not_found)
        .with_state(state.clone());

    if let Some(handle) = prometheus_handle {
        let metrics_router = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(handle);
        app = app.merge(metrics_router);
    }

    let body_limit = state.config().body_limit_bytes;

    app.layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(middleware::from_fn_with_state(state.clone(), maintenance_gate))
        .layer(middleware::from_fn_with_state(state, record_request))
        .layer(middleware::from_fn(
            crate::metrics::http::http_metrics_middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            ServiceBuilder::new()
                .layer(RequestIdLayer)
                .layer(LoggingLayer),
        )
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::Internal("Internal server error".to_string()).into_response()
}

/// Runs the server until Ctrl+C or SIGTERM.
///
/// Starts the settings watcher and the rate-limit sweeper, both stopped when
/// the server returns.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: Option<PrometheusHandle>,
) -> Result<(), std::io::Error> {
    let window = Duration::from_millis(state.settings().snapshot().rate_limit.window_ms);
    let watcher = tasks::watch_settings(
        state.settings().clone(),
        state.config().settings_reload_interval(),
    );
    let sweeper = tasks::sweep_rate_limits(state.limiter().clone(), window);

    let app = create_router(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    watcher.stop();
    sweeper.stop();
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
