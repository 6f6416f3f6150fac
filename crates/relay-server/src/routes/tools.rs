//! Utility routes: upscaling, OCR and app builds.

use axum::{Json, Router, extract::State, routing::get};
use relay_core::{Category, EndpointInfo, Envelope, GET_POST, ParamInfo};
use relay_sources::tools::{AppRequest, OcrResult, UpscaleResult, Upscaler};
use serde_json::Value;
use tracing::instrument;

use super::{respond, upstream_failure};
use crate::error::ApiResult;
use crate::extractors::Params;
use crate::state::AppState;

pub const ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo {
        name: "Image Upscaler",
        path: "/tools/upscale",
        category: Category::Tools,
        methods: GET_POST,
        description: "Upscales an image and returns the download URL",
        params: &[
            ParamInfo::required("url", "Image URL"),
            ParamInfo::optional("scale", "2 or 4, default 2"),
        ],
    },
    EndpointInfo {
        name: "Image OCR",
        path: "/api/ocr/image",
        category: Category::Tools,
        methods: GET_POST,
        description: "Extracts the text of an image",
        params: &[ParamInfo::required("url", "Image URL")],
    },
    EndpointInfo {
        name: "App Maker",
        path: "/api/tools/appmaker",
        category: Category::Tools,
        methods: GET_POST,
        description: "Builds an Android app wrapping a website",
        params: &[
            ParamInfo::required("url", "Website URL"),
            ParamInfo::required("email", "Contact email"),
            ParamInfo::required("appName", "App name"),
            ParamInfo::required("icon", "Icon image URL"),
            ParamInfo::required("splash", "Splash image URL"),
        ],
    },
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tools/upscale", get(upscale).post(upscale))
        .route("/api/ocr/image", get(ocr).post(ocr))
        .route("/api/tools/appmaker", get(appmaker).post(appmaker))
}

#[instrument(skip_all)]
pub async fn upscale(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<UpscaleResult>>> {
    let url = params.require("url")?;
    let scale = Upscaler::parse_scale(params.get("scale").as_deref())
        .map_err(|e| upstream_failure("imglarger", e))?;
    respond("imglarger", state.sources().upscaler.upscale(&url, scale).await)
}

#[instrument(skip_all)]
pub async fn ocr(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<OcrResult>>> {
    let url = params.require("url")?;
    respond("ocr", state.sources().ocr.extract(&url).await)
}

#[instrument(skip_all)]
pub async fn appmaker(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<Value>>> {
    let request = AppRequest {
        url: params.require("url")?,
        email: params.require("email")?,
        app_name: params.require("appName")?,
        icon: params.require("icon")?,
        splash: params.require("splash")?,
    };
    respond("appmaker", state.sources().appmaker.build(&request).await)
}
