//! Spotify track downloader backed by downloaderize.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::media::{MediaItem, MediaKind};
use crate::validate;

/// Nonce the downloaderize WordPress plugin expects.
const NONCE: &str = "4658c378c7";

#[derive(Debug, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    success: bool,
    data: Option<TrackInfo>,
}

#[derive(Debug, Deserialize)]
struct TrackInfo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    medias: Vec<TrackMedia>,
}

#[derive(Debug, Deserialize)]
struct TrackMedia {
    url: String,
    #[serde(default)]
    quality: Option<String>,
    #[serde(default)]
    extension: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub title: String,
    pub artist: String,
    pub duration: Option<String>,
    pub cover: Option<String>,
    pub original_url: String,
    pub media_urls: Vec<MediaItem>,
}

#[derive(Debug, Clone)]
pub struct Spotify {
    http: HttpClient,
    base: String,
}

impl Spotify {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "downloaderize"))]
    pub async fn download(&self, url: &str) -> Result<SpotifyTrack> {
        let url = validate::url_for(url, &["spotify.com"], "Spotify")?;

        let request = self
            .http
            .post(format!("{}/wp-admin/admin-ajax.php", self.base))
            .header("origin", &self.base)
            .header("referer", format!("{}/", self.base))
            .form(&[
                ("action", "spotify_downloader_get_info"),
                ("url", url.as_str()),
                ("nonce", NONCE),
            ]);
        let response: InfoResponse = self.http.json(request).await?;

        let info = match response.data {
            Some(info) if response.success && !info.medias.is_empty() => info,
            _ => return Err(SourceError::not_found("Track not found or not downloadable")),
        };

        let media_urls = info
            .medias
            .into_iter()
            .map(|m| {
                let item = MediaItem::new(MediaKind::Audio, m.url).ext(m.extension);
                match m.quality {
                    Some(q) => item.quality(q),
                    None => item,
                }
            })
            .collect();

        Ok(SpotifyTrack {
            id: info.id,
            title: info.title,
            artist: info.author,
            duration: info.duration,
            cover: info.thumbnail,
            original_url: url.to_string(),
            media_urls,
        })
    }
}
