//! Media downloader routes.

use axum::{Json, Router, extract::State, routing::get};
use relay_core::{Category, EndpointInfo, Envelope, GET_POST, ParamInfo};
use relay_sources::downloader::{
    DouyinVideo, InstagramPost, Pin, SpotifyTrack, TikTokVideo, TweetMedia, YoutubeVideoDownload,
};
use tracing::instrument;

use super::respond;
use crate::error::ApiResult;
use crate::extractors::Params;
use crate::state::AppState;

const URL: &[ParamInfo] = &[ParamInfo::required("url", "Public post URL")];

pub const ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo {
        name: "TikTok Downloader",
        path: "/api/d/tiktok",
        category: Category::Downloader,
        methods: GET_POST,
        description: "Video or slideshow media from a TikTok post",
        params: URL,
    },
    EndpointInfo {
        name: "Spotify Downloader",
        path: "/downloader/spotify",
        category: Category::Downloader,
        methods: GET_POST,
        description: "Track metadata and an MP3 link",
        params: URL,
    },
    EndpointInfo {
        name: "Instagram Downloader",
        path: "/downloader/instagram",
        category: Category::Downloader,
        methods: GET_POST,
        description: "Media of a post, reel or story",
        params: URL,
    },
    EndpointInfo {
        name: "Twitter Downloader",
        path: "/downloader/twitter",
        category: Category::Downloader,
        methods: GET_POST,
        description: "Video and image downloads of a tweet",
        params: URL,
    },
    EndpointInfo {
        name: "Douyin Downloader",
        path: "/api/d/douyin",
        category: Category::Downloader,
        methods: GET_POST,
        description: "Caption, thumbnail and media of a Douyin video",
        params: URL,
    },
    EndpointInfo {
        name: "Pinterest Downloader",
        path: "/api/d/pinterest",
        category: Category::Downloader,
        methods: GET_POST,
        description: "Video or image of a pin",
        params: URL,
    },
    EndpointInfo {
        name: "YouTube Downloader",
        path: "/downloader/youtube",
        category: Category::Downloader,
        methods: GET_POST,
        description: "Direct file links for each video resolution",
        params: URL,
    },
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/d/tiktok", get(tiktok).post(tiktok))
        .route("/downloader/spotify", get(spotify).post(spotify))
        .route("/downloader/instagram", get(instagram).post(instagram))
        .route("/downloader/twitter", get(twitter).post(twitter))
        .route("/api/d/douyin", get(douyin).post(douyin))
        .route("/api/d/pinterest", get(pinterest).post(pinterest))
        .route("/downloader/youtube", get(youtube).post(youtube))
}

#[instrument(skip_all)]
pub async fn tiktok(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<TikTokVideo>>> {
    let url = params.require("url")?;
    respond("tiktok", state.sources().tiktok.download(&url).await)
}

#[instrument(skip_all)]
pub async fn spotify(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<SpotifyTrack>>> {
    let url = params.require("url")?;
    respond("spotify", state.sources().spotify.download(&url).await)
}

#[instrument(skip_all)]
pub async fn instagram(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<InstagramPost>>> {
    let url = params.require("url")?;
    respond("instagram", state.sources().instagram.download(&url).await)
}

#[instrument(skip_all)]
pub async fn twitter(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<TweetMedia>>> {
    let url = params.require("url")?;
    respond("twitter", state.sources().twitter.download(&url).await)
}

#[instrument(skip_all)]
pub async fn douyin(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<DouyinVideo>>> {
    let url = params.require("url")?;
    respond("douyin", state.sources().douyin.download(&url).await)
}

#[instrument(skip_all)]
pub async fn pinterest(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<Pin>>> {
    let url = params.require("url")?;
    respond("pinterest", state.sources().pinterest.download(&url).await)
}

#[instrument(skip_all)]
pub async fn youtube(
    State(state): State<AppState>,
    params: Params,
) -> ApiResult<Json<Envelope<YoutubeVideoDownload>>> {
    let url = params.require("url")?;
    respond("ytdown", state.sources().youtube.download(&url).await)
}
