//! TikTok video downloader backed by the tikwm API.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::media::{MediaItem, MediaKind};
use crate::validate;

#[derive(Debug, Deserialize)]
struct TikwmResponse {
    #[serde(default)]
    msg: Option<String>,
    data: Option<TikwmVideo>,
}

#[derive(Debug, Deserialize)]
struct TikwmVideo {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    play: Option<String>,
    #[serde(default)]
    wmplay: Option<String>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    author: Option<TikwmAuthor>,
}

#[derive(Debug, Deserialize)]
struct TikwmAuthor {
    #[serde(default)]
    unique_id: String,
    #[serde(default)]
    nickname: String,
    #[serde(default)]
    avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TikTokAuthor {
    pub username: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TikTokVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub original_url: String,
    pub final_url: Option<String>,
    pub author: Option<TikTokAuthor>,
    pub media_urls: Vec<MediaItem>,
}

#[derive(Debug, Clone)]
pub struct TikTok {
    http: HttpClient,
    base: String,
}

impl TikTok {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "tikwm"))]
    pub async fn download(&self, url: &str) -> Result<TikTokVideo> {
        let url = validate::url_for(url, &["tiktok.com"], "TikTok")?;

        let request = self
            .http
            .get(format!("{}/api/", self.base))
            .query(&[("url", url.as_str()), ("hd", "1")]);
        let response: TikwmResponse = self.http.json(request).await?;

        let Some(video) = response.data else {
            let reason = response.msg.filter(|m| !m.is_empty() && m != "success");
            return Err(SourceError::not_found(
                reason.unwrap_or_else(|| "Video not found".to_string()),
            ));
        };

        Ok(into_video(video, url.to_string()))
    }
}

fn into_video(video: TikwmVideo, original_url: String) -> TikTokVideo {
    let mut media_urls = Vec::new();
    if let Some(play) = &video.play {
        media_urls.push(
            MediaItem::new(MediaKind::Video, play)
                .quality("hd")
                .thumbnail(video.cover.clone()),
        );
    }
    if let Some(wmplay) = &video.wmplay {
        media_urls.push(
            MediaItem::new(MediaKind::Video, wmplay)
                .quality("watermark")
                .thumbnail(video.cover.clone()),
        );
    }

    TikTokVideo {
        id: video.id,
        description: video.title.clone(),
        title: video.title,
        original_url,
        final_url: video.play,
        author: video.author.map(|a| TikTokAuthor {
            username: a.unique_id,
            nickname: a.nickname,
            avatar: a.avatar,
        }),
        media_urls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_order_hd_first() {
        let video = TikwmVideo {
            id: "7301".into(),
            title: "dance".into(),
            play: Some("https://cdn/play.mp4".into()),
            wmplay: Some("https://cdn/wm.mp4".into()),
            cover: Some("https://cdn/cover.jpg".into()),
            author: None,
        };

        let out = into_video(video, "https://www.tiktok.com/@a/video/7301".into());
        assert_eq!(out.media_urls.len(), 2);
        assert_eq!(out.media_urls[0].quality.as_deref(), Some("hd"));
        assert_eq!(out.final_url.as_deref(), Some("https://cdn/play.mp4"));
        assert_eq!(out.description, "dance");
    }
}
