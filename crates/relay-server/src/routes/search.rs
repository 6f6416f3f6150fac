//! Search routes.

use axum::{Json, Router, extract::State, routing::get};
use relay_core::{Category, EndpointInfo, Envelope, GET_POST, ParamInfo};
use relay_sources::search::{PinterestImages, RecipeResults, TikTokSearchVideo, YoutubeResults};
use serde_json::Value;
use tracing::instrument;

use super::respond;
use crate::error::ApiResult;
use crate::extractors::Params;
use crate::state::AppState;

/// Aliases accepted for the search terms.
const QUERY: [&str; 2] = ["query", "q"];

pub const ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo {
        name: "YouTube Search",
        path: "/search/youtube",
        category: Category::Search,
        methods: GET_POST,
        description: "Videos matching a query",
        params: &[
            ParamInfo::required("query", "Search terms (alias: q)"),
            ParamInfo::optional("limit", "Max results, default 10, at most 50"),
        ],
    },
    EndpointInfo {
        name: "TikTok Search",
        path: "/search/tiktok",
        category: Category::Search,
        methods: GET_POST,
        description: "Videos with stats and media links",
        params: &[
            ParamInfo::required("query", "Search terms (alias: q)"),
            ParamInfo::optional("count", "Number of videos, default 15"),
        ],
    },
    EndpointInfo {
        name: "Pinterest Search",
        path: "/search/pinterest",
        category: Category::Search,
        methods: GET_POST,
        description: "Up to five random image URLs",
        params: &[ParamInfo::required("query", "Search terms (alias: q)")],
    },
    EndpointInfo {
        name: "Lyrics Search",
        path: "/search/lyrics",
        category: Category::Search,
        methods: GET_POST,
        description: "Synced and plain lyrics from lrclib",
        params: &[ParamInfo::required("q", "Song title")],
    },
    EndpointInfo {
        name: "Cookpad Search",
        path: "/search/cookpad",
        category: Category::Search,
        methods: GET_POST,
        description: "Recipes with ingredients and steps",
        params: &[
            ParamInfo::required("q", "Dish or ingredient"),
            ParamInfo::optional("limit", "Number of recipes, default 5"),
        ],
    },
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search/youtube", get(youtube).post(youtube))
        .route("/search/tiktok", get(tiktok).post(tiktok))
        .route("/search/pinterest", get(pinterest).post(pinterest))
        .route("/search/lyrics", get(lyrics).post(lyrics))
        .route("/search/cookpad", get(cookpad).post(cookpad))
}

#[instrument(skip_all)]
pub async fn youtube(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<YoutubeResults>>> {
    let query = params.require_any(&QUERY)?;
    let limit = params.number::<usize>("limit")?;
    respond(
        "youtube",
        state.sources().youtube_search.search(&query, limit).await,
    )
}

#[instrument(skip_all)]
pub async fn tiktok(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<Vec<TikTokSearchVideo>>>> {
    let query = params.require_any(&QUERY)?;
    let count = params.number::<u32>("count")?;
    respond(
        "tiktok-search",
        state.sources().tiktok_search.search(&query, count).await,
    )
}

#[instrument(skip_all)]
pub async fn pinterest(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<PinterestImages>>> {
    let query = params.require_any(&QUERY)?;
    respond(
        "pinterest-search",
        state.sources().pinterest_search.search(&query).await,
    )
}

#[instrument(skip_all)]
pub async fn lyrics(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<Vec<Value>>>> {
    let title = params.require("q")?;
    respond("lyrics", state.sources().lyrics.search(&title).await)
}

#[instrument(skip_all)]
pub async fn cookpad(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<RecipeResults>>> {
    let query = params.require("q")?;
    let limit = params.number::<usize>("limit")?;
    respond("cookpad", state.sources().cookpad.search(&query, limit).await)
}
