//! Instagram downloader.
//!
//! Tries the snapins mirror first and falls back to igram. This is the only
//! integration that retries against a second source.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{instrument, warn};

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::media::{MediaItem, MediaKind};
use crate::validate;

#[derive(Debug, Deserialize)]
struct SnapinsResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Vec<MirrorItem>,
}

#[derive(Debug, Deserialize)]
struct IgramResponse {
    #[serde(default)]
    data: Vec<MirrorItem>,
}

#[derive(Debug, Deserialize)]
struct MirrorItem {
    url: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstagramPost {
    pub original_url: String,
    pub source: String,
    pub count: usize,
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone)]
pub struct Instagram {
    http: HttpClient,
    snapins: String,
    igram: String,
}

impl Instagram {
    pub fn new(http: HttpClient, snapins: impl Into<String>, igram: impl Into<String>) -> Self {
        Self {
            http,
            snapins: snapins.into(),
            igram: igram.into(),
        }
    }

    #[instrument(skip_all, fields(service = "instagram"))]
    pub async fn download(&self, url: &str) -> Result<InstagramPost> {
        let url = validate::url_for(url, &["instagram.com"], "Instagram")?;

        let (source, items) = match self.snapins(url.as_str()).await {
            Ok(items) => ("snapins", items),
            Err(e) => {
                warn!(error = %e, "snapins failed, trying igram");
                match self.igram(url.as_str()).await {
                    Ok(items) => ("igram", items),
                    Err(e) => {
                        warn!(error = %e, "igram failed");
                        return Err(SourceError::upstream("instagram", "all mirrors failed"));
                    },
                }
            },
        };

        let media: Vec<MediaItem> = items
            .into_iter()
            .map(|item| {
                MediaItem::new(MediaKind::guess(item.kind.as_deref(), &item.url), item.url)
                    .thumbnail(item.thumbnail)
                    .source(source)
            })
            .collect();

        Ok(InstagramPost {
            original_url: url.to_string(),
            source: source.to_string(),
            count: media.len(),
            media,
        })
    }

    async fn snapins(&self, url: &str) -> Result<Vec<MirrorItem>> {
        let request = self
            .http
            .post(format!("{}/action.php", self.snapins))
            .form(&[("url", url)]);
        let response: SnapinsResponse = self.http.json(request).await?;

        if response.status != "success" || response.data.is_empty() {
            return Err(SourceError::upstream("snapins", "no media returned"));
        }
        Ok(response.data)
    }

    async fn igram(&self, url: &str) -> Result<Vec<MirrorItem>> {
        let request = self
            .http
            .post(format!("{}/api/igdl", self.igram))
            .json(&json!({ "url": url }));
        let response: IgramResponse = self.http.json(request).await?;

        if response.data.is_empty() {
            return Err(SourceError::upstream("igram", "no media returned"));
        }
        Ok(response.data)
    }
}
