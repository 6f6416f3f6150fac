//! Integration routes.
//!
//! Each category module owns its handlers, its route table and the
//! [`EndpointInfo`] catalog entries describing them. Every integration
//! answers both GET and POST with the same [`Params`] semantics.
//!
//! [`Params`]: crate::extractors::Params

pub mod ai;
pub mod downloader;
pub mod random;
pub mod search;
pub mod tools;

use axum::{
    Json, Router,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use relay_core::{EndpointInfo, Envelope};
use relay_sources::{Fetched, SourceError};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::metrics::http::record_upstream_error;
use crate::state::AppState;

/// All integration routes, without gates or caching.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(downloader::router())
        .merge(search::router())
        .merge(random::router())
        .merge(tools::router())
        .merge(ai::router())
}

/// Every registered integration endpoint, grouped by module order.
pub fn catalog() -> impl Iterator<Item = &'static EndpointInfo> {
    downloader::ENDPOINTS
        .iter()
        .chain(search::ENDPOINTS)
        .chain(random::ENDPOINTS)
        .chain(tools::ENDPOINTS)
        .chain(ai::ENDPOINTS)
}

/// Wraps an integration result in the success envelope, recording upstream
/// failures under `service`.
pub(crate) fn respond<T: Serialize>(
    service: &'static str,
    result: Result<T, SourceError>,
) -> ApiResult<Json<Envelope<T>>> {
    result.map(|value| Json(Envelope::ok(value))).map_err(|e| upstream_failure(service, e))
}

pub(crate) fn upstream_failure(service: &'static str, err: SourceError) -> ApiError {
    if !err.is_client_error() {
        record_upstream_error(service, err.code());
    }
    ApiError::Source(err)
}

/// Serves fetched image bytes inline.
pub(crate) fn image_response(stem: &str, fetched: Fetched) -> Response {
    let content_type = fetched
        .content_type
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or_else(|| "image/jpeg".to_string());
    let extension = image_extension(&content_type);
    let length = fetched.bytes.len();

    let mut response = fetched.bytes.into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=3600"),
    );
    if let Ok(value) =
        HeaderValue::from_str(&format!("inline; filename=\"{}.{}\"", stem, extension))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

fn image_extension(content_type: &str) -> &'static str {
    let subtype = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_start_matches("image/");
    match subtype {
        "png" => "png",
        "gif" => "gif",
        "webp" => "webp",
        "avif" => "avif",
        "svg+xml" => "svg",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use bytes::Bytes;
    use std::collections::HashSet;

    #[test]
    fn catalog_paths_are_unique() {
        let paths: Vec<&str> = catalog().map(|e| e.path).collect();
        let unique: HashSet<&str> = paths.iter().copied().collect();
        assert_eq!(paths.len(), unique.len());
    }

    #[test]
    fn catalog_paths_sit_under_gated_prefixes() {
        for endpoint in catalog() {
            assert!(
                crate::gate::is_api_path(endpoint.path),
                "{} is outside the gated prefixes",
                endpoint.path
            );
        }
    }

    #[test]
    fn extension_follows_content_type() {
        assert_eq!(image_extension("image/png"), "png");
        assert_eq!(image_extension("image/jpeg; charset=binary"), "jpg");
        assert_eq!(image_extension("image/webp"), "webp");
    }

    #[test]
    fn image_response_headers() {
        let response = image_response(
            "cat",
            Fetched {
                bytes: Bytes::from_static(b"\x89PNG"),
                content_type: Some("image/png".to_string()),
            },
        );

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(headers[header::CONTENT_LENGTH], "4");
        assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=3600");
        assert_eq!(headers[header::CONTENT_DISPOSITION], "inline; filename=\"cat.png\"");
    }

    #[test]
    fn non_image_content_type_falls_back_to_jpeg() {
        let response = image_response(
            "waifu",
            Fetched {
                bytes: Bytes::from_static(b"data"),
                content_type: Some("text/html".to_string()),
            },
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    }
}
