//! Random content routes: images, anh.moe posts and anime quotes.

use axum::{Json, Router, extract::State, response::Response, routing::get};
use relay_core::{Category, EndpointInfo, Envelope, GET_POST, ParamInfo};
use relay_sources::random::{AnhmoePost, AnimeQuote, ImageKind};
use tracing::instrument;

use super::{image_response, respond, upstream_failure};
use crate::error::ApiResult;
use crate::extractors::Params;
use crate::state::AppState;

const fn image_endpoint(
    name: &'static str,
    path: &'static str,
    description: &'static str,
) -> EndpointInfo {
    EndpointInfo {
        name,
        path,
        category: Category::Random,
        methods: GET_POST,
        description,
        params: &[],
    }
}

pub const ENDPOINTS: &[EndpointInfo] = &[
    image_endpoint("Random Cat", "/api/r/cats", "A random cat picture"),
    image_endpoint("Random Waifu", "/api/r/waifu", "A random waifu picture"),
    image_endpoint("Random Neko", "/api/r/neko", "A random neko picture"),
    image_endpoint("Random China", "/api/r/china", "A random picture from the china set"),
    image_endpoint("Blue Archive", "/random/ba", "A random Blue Archive artwork"),
    EndpointInfo {
        name: "Anhmoe",
        path: "/random/anhmoe",
        category: Category::Random,
        methods: GET_POST,
        description: "A random post from an anh.moe category",
        params: &[ParamInfo::required(
            "category",
            "One of sfw, nsfw, video-gore, video-nsfw, moe, ai-picture, hentai",
        )],
    },
    EndpointInfo {
        name: "Anime Quotes",
        path: "/api/r/quotesanime",
        category: Category::Random,
        methods: GET_POST,
        description: "Quotes from a random feed page",
        params: &[ParamInfo::optional("page", "Feed page instead of a random one")],
    },
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/r/cats", get(cat).post(cat))
        .route("/api/r/waifu", get(waifu).post(waifu))
        .route("/api/r/neko", get(neko).post(neko))
        .route("/api/r/china", get(china).post(china))
        .route("/random/ba", get(blue_archive).post(blue_archive))
        .route("/random/anhmoe", get(anhmoe).post(anhmoe))
        .route("/api/r/quotesanime", get(quotes).post(quotes))
}

async fn random_image(state: &AppState, kind: ImageKind) -> ApiResult<Response> {
    let fetched = state
        .sources()
        .images
        .fetch(kind)
        .await
        .map_err(|e| upstream_failure(kind.file_stem(), e))?;
    Ok(image_response(kind.file_stem(), fetched))
}

pub async fn cat(State(state): State<AppState>) -> ApiResult<Response> {
    random_image(&state, ImageKind::Cat).await
}

pub async fn waifu(State(state): State<AppState>) -> ApiResult<Response> {
    random_image(&state, ImageKind::Waifu).await
}

pub async fn neko(State(state): State<AppState>) -> ApiResult<Response> {
    random_image(&state, ImageKind::Neko).await
}

pub async fn china(State(state): State<AppState>) -> ApiResult<Response> {
    random_image(&state, ImageKind::China).await
}

pub async fn blue_archive(State(state): State<AppState>) -> ApiResult<Response> {
    random_image(&state, ImageKind::Ba).await
}

#[instrument(skip_all)]
pub async fn anhmoe(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<AnhmoePost>>> {
    let category = params.require("category")?;
    respond("anhmoe", state.sources().anhmoe.random(&category).await)
}

#[instrument(skip_all)]
pub async fn quotes(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<Vec<AnimeQuote>>>> {
    let quotes = &state.sources().quotes;
    let result = match params.number::<u32>("page")? {
        Some(page) => quotes.page(page).await,
        None => quotes.random().await,
    };
    respond("otakotaku", result)
}
