//! Client address resolution.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Address used to key the per-client rate limit.
///
/// With `trust_proxy` the first `X-Forwarded-For` hop wins; otherwise (or
/// when the header is absent) the socket peer is used. Requests without
/// connection info share the `unknown` bucket.
pub fn client_ip<B>(request: &Request<B>, trust_proxy: bool) -> String {
    if trust_proxy && let Some(ip) = forwarded_for(request.headers()) {
        return ip;
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|hop| !hop.is_empty())
        .map(String::from)
}
