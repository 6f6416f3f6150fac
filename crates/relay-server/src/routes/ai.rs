//! AI routes: image-to-image, NSFW classification and chat.

use axum::{Json, Router, extract::State, routing::get};
use relay_core::{Category, EndpointInfo, Envelope, GET_POST, ParamInfo};
use relay_sources::ai::{ChatAnswer, ChatRequest, GeneratedImage, NsfwVerdict};
use tracing::instrument;

use super::respond;
use crate::error::ApiResult;
use crate::extractors::Params;
use crate::state::AppState;

pub const ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo {
        name: "Image to Image",
        path: "/ai/img2img",
        category: Category::Ai,
        methods: GET_POST,
        description: "Edits an image following a prompt",
        params: &[
            ParamInfo::required("url", "Source image URL"),
            ParamInfo::required("prompt", "Edit instructions"),
        ],
    },
    EndpointInfo {
        name: "NSFW Check",
        path: "/ai/nsfw-check",
        category: Category::Ai,
        methods: GET_POST,
        description: "Classifies an image as safe or not",
        params: &[ParamInfo::required("url", "Image URL")],
    },
    EndpointInfo {
        name: "Z.ai Chat",
        path: "/ai/zai",
        category: Category::Ai,
        methods: GET_POST,
        description: "Answers a question with a GLM model",
        params: &[
            ParamInfo::required("question", "The prompt"),
            ParamInfo::optional("model", "Model name, default glm-4.5"),
            ParamInfo::optional("system_prompt", "System instructions"),
            ParamInfo::optional("search", "Enable web search (true/false)"),
        ],
    },
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ai/img2img", get(img2img).post(img2img))
        .route("/ai/nsfw-check", get(nsfw_check).post(nsfw_check))
        .route("/ai/zai", get(zai).post(zai))
}

#[instrument(skip_all)]
pub async fn img2img(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<GeneratedImage>>> {
    let url = params.require("url")?;
    let prompt = params.require("prompt")?;
    respond("nanana", state.sources().img2img.generate(&url, &prompt).await)
}

#[instrument(skip_all)]
pub async fn nsfw_check(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<NsfwVerdict>>> {
    let url = params.require("url")?;
    respond("nyckel", state.sources().nsfw.classify(&url).await)
}

#[instrument(skip_all, fields(model = tracing::field::Empty))]
pub async fn zai(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<ChatAnswer>>> {
    let request = ChatRequest {
        question: params.require("question")?,
        model: params.get("model"),
        system_prompt: params.get("system_prompt"),
        search: params.flag("search"),
    };
    if let Some(model) = &request.model {
        tracing::Span::current().record("model", model.as_str());
    }
    respond("zai", state.sources().zai.chat(&request).await)
}
