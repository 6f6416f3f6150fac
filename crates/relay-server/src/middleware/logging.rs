//! One `http_request` span per request, with a start and an outcome event.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response, StatusCode},
};
use tower::{Layer, Service};
use tracing::{Instrument, Level, debug, info, info_span, warn};

use super::request_id::RequestId;
use crate::gate::is_api_path;

/// Probe paths logged at debug level only.
const QUIET_PATHS: [&str; 2] = ["/health", "/metrics"];

/// Coarse grouping used as a span field so logs can be filtered by surface.
fn surface(path: &str) -> &'static str {
    if is_api_path(path) {
        "integration"
    } else if path.starts_with("/manage/") || path == "/manage" {
        "admin"
    } else {
        "gateway"
    }
}

#[derive(Clone, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = LoggingMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LoggingMiddleware { inner }
    }
}

#[derive(Clone)]
pub struct LoggingMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for LoggingMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let start = Instant::now();
        let path = request.uri().path().to_string();
        let quiet = QUIET_PATHS.contains(&path.as_str());

        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_default();

        let span = info_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method(),
            path = %path,
            surface = surface(&path),
            peer = %peer,
        );

        let mut inner = self.inner.clone();

        Box::pin(
            async move {
                if !quiet {
                    info!("Request started");
                }

                let response = inner.call(request).await?;
                let status = response.status();
                let duration_ms = start.elapsed().as_millis() as u64;

                let level = outcome_level(status, quiet);
                if level == Level::WARN {
                    warn!(status = status.as_u16(), duration_ms, "Request failed");
                } else if level == Level::INFO {
                    info!(status = status.as_u16(), duration_ms, "Request completed");
                } else {
                    debug!(status = status.as_u16(), duration_ms, "Request completed");
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

fn outcome_level(status: StatusCode, quiet: bool) -> Level {
    if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
        Level::WARN
    } else if quiet {
        Level::DEBUG
    } else {
        Level::INFO
    }
}
