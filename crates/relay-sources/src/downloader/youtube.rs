//! YouTube video downloader backed by ytdown.
//!
//! ytdown answers in two steps on the same endpoint: the video URL yields
//! the available formats, then each format's media URL yields its final
//! file link.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::validate;

#[derive(Debug, Deserialize)]
struct ProxyResponse<T> {
    api: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    image_preview_url: Option<String>,
    #[serde(default)]
    user_info: Option<UserInfo>,
    media_items: Option<Vec<MediaEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    is_verified: bool,
    #[serde(default)]
    user_avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    media_res: Option<String>,
    #[serde(default)]
    media_url: String,
    #[serde(default)]
    media_file_size: Option<String>,
    #[serde(default)]
    media_extension: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileLink {
    file_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct YoutubeChannel {
    pub name: Option<String>,
    pub username: Option<String>,
    pub verified: bool,
    pub avatar: Option<String>,
}

/// One resolution of the video with its direct file link.
#[derive(Debug, Clone, Serialize)]
pub struct YoutubeDownload {
    pub resolution: String,
    pub size: Option<String>,
    pub extension: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct YoutubeVideoDownload {
    pub title: String,
    pub thumbnail: Option<String>,
    pub channel: YoutubeChannel,
    pub downloads: Vec<YoutubeDownload>,
}

#[derive(Debug, Clone)]
pub struct YoutubeDownloader {
    http: HttpClient,
    base: String,
}

impl YoutubeDownloader {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "ytdown"))]
    pub async fn download(&self, url: &str) -> Result<YoutubeVideoDownload> {
        let url = validate::url_for(url, &["youtube.com", "youtu.be"], "YouTube")?;

        let response: ProxyResponse<VideoInfo> = self.proxy(url.as_str()).await?;
        let (info, items) = match response.api {
            Some(mut info) => match info.media_items.take() {
                Some(items) => (info, items),
                None => return Err(SourceError::not_found("Video info not found")),
            },
            None => return Err(SourceError::not_found("Video info not found")),
        };

        let videos = items
            .into_iter()
            .filter(|item| item.kind.eq_ignore_ascii_case("video"))
            .filter_map(|item| {
                let resolution = item.media_res.clone().filter(|r| !r.is_empty())?;
                Some((resolution, item))
            });
        let downloads: Vec<YoutubeDownload> =
            join_all(videos.map(|(resolution, item)| self.resolve(resolution, item)))
                .await
                .into_iter()
                .flatten()
                .collect();

        if downloads.is_empty() {
            return Err(SourceError::not_found("No downloadable video formats"));
        }

        let user = info.user_info.unwrap_or_default();
        Ok(YoutubeVideoDownload {
            title: info.title,
            thumbnail: info.image_preview_url,
            channel: YoutubeChannel {
                name: user.name.filter(|n| !n.is_empty()),
                username: user.username.filter(|n| !n.is_empty()),
                verified: user.is_verified,
                avatar: user.user_avatar.filter(|a| !a.is_empty()),
            },
            downloads,
        })
    }

    /// Final file link of one format; `None` when ytdown has none for it.
    async fn resolve(&self, resolution: String, item: MediaEntry) -> Option<YoutubeDownload> {
        let link = match self.proxy::<FileLink>(&item.media_url).await {
            Ok(ProxyResponse { api: Some(link) }) => link.file_url,
            Ok(_) => None,
            Err(e) => {
                warn!(resolution = %resolution, error = %e, "Format link unavailable");
                return None;
            }
        };

        Some(YoutubeDownload {
            resolution,
            size: item.media_file_size,
            extension: item.media_extension,
            url: link.filter(|l| !l.is_empty())?,
        })
    }

    async fn proxy<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<ProxyResponse<T>> {
        let request = self
            .http
            .post(format!("{}/proxy.php", self.base))
            .header("origin", &self.base)
            .form(&[("url", url)]);
        self.http.json(request).await
    }
}
