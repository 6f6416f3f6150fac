//! TikTok search through the tikwm feed API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::validate;

pub const DEFAULT_COUNT: u32 = 15;

#[derive(Debug, Deserialize)]
struct FeedResponse {
    data: Option<FeedData>,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    #[serde(default)]
    videos: Vec<FeedVideo>,
}

#[derive(Debug, Deserialize)]
struct FeedVideo {
    #[serde(alias = "video_id")]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: FeedAuthor,
    #[serde(default)]
    play_count: u64,
    #[serde(default)]
    digg_count: u64,
    #[serde(default)]
    comment_count: u64,
    #[serde(default)]
    share_count: u64,
    #[serde(default)]
    music_info: Value,
    #[serde(default)]
    play: String,
    #[serde(default)]
    wmplay: String,
    #[serde(default)]
    music: String,
    #[serde(default)]
    cover: String,
}

#[derive(Debug, Default, Deserialize)]
struct FeedAuthor {
    #[serde(default)]
    nickname: String,
    #[serde(default)]
    unique_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoAuthor {
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoStats {
    pub play_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoMedia {
    pub no_watermark: String,
    pub watermark: String,
    pub music: String,
    pub cover: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TikTokSearchVideo {
    pub id: String,
    pub title: String,
    pub author: VideoAuthor,
    pub stats: VideoStats,
    pub music: Value,
    pub media: VideoMedia,
}

#[derive(Debug, Clone)]
pub struct TikTokSearch {
    http: HttpClient,
    base: String,
}

impl TikTokSearch {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "tikwm"))]
    pub async fn search(&self, query: &str, count: Option<u32>) -> Result<Vec<TikTokSearchVideo>> {
        let query = validate::non_empty(query, "query")?;
        let count = count.unwrap_or(DEFAULT_COUNT).max(1).to_string();

        let request = self
            .http
            .post(format!("{}/api/feed/search", self.base))
            .header("accept", "application/json, text/javascript, */*; q=0.01")
            .header("x-requested-with", "XMLHttpRequest")
            .form(&[
                ("keywords", query),
                ("count", count.as_str()),
                ("cursor", "0"),
                ("web", "1"),
                ("hd", "1"),
            ]);
        let response: FeedResponse = self.http.json(request).await?;

        let videos = response.data.map(|d| d.videos).unwrap_or_default();
        if videos.is_empty() {
            return Err(SourceError::not_found("No videos found"));
        }

        Ok(videos.into_iter().map(|v| self.map_video(v)).collect())
    }

    fn absolute(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base, path)
        }
    }

    fn map_video(&self, video: FeedVideo) -> TikTokSearchVideo {
        TikTokSearchVideo {
            media: VideoMedia {
                no_watermark: self.absolute(&video.play),
                watermark: self.absolute(&video.wmplay),
                music: self.absolute(&video.music),
                cover: self.absolute(&video.cover),
            },
            id: video.id,
            title: video.title,
            author: VideoAuthor {
                name: video.author.nickname,
                username: video.author.unique_id,
            },
            stats: VideoStats {
                play_count: video.play_count,
                like_count: video.digg_count,
                comment_count: video.comment_count,
                share_count: video.share_count,
            },
            music: video.music_info,
        }
    }
}
