//! Douyin downloader backed by savetik.

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::html;
use crate::media::{MediaItem, MediaKind};
use crate::validate;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DouyinVideo {
    pub caption: Option<String>,
    pub thumbnail: Option<String>,
    pub original_url: String,
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone)]
pub struct Douyin {
    http: HttpClient,
    base: String,
}

impl Douyin {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "savetik"))]
    pub async fn download(&self, url: &str) -> Result<DouyinVideo> {
        let url = validate::url_for(url, &["douyin.com", "iesdouyin.com"], "Douyin")?;

        let request = self
            .http
            .post(format!("{}/api/ajaxSearch", self.base))
            .header("referer", format!("{}/id/douyin-downloader", self.base))
            .header("x-requested-with", "XMLHttpRequest")
            .form(&[("q", url.as_str()), ("lang", "id"), ("cftoken", "")]);
        let response: SearchResponse = self.http.json(request).await?;

        let fragment = response
            .data
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| SourceError::not_found("Video not found"))?;

        let mut video = parse_fragment(&fragment)?;
        if video.media.is_empty() {
            return Err(SourceError::not_found("No downloadable media found"));
        }
        video.original_url = url.to_string();
        Ok(video)
    }
}

fn classify(label: &str) -> Option<(MediaKind, &'static str)> {
    let upper = label.to_ascii_uppercase();
    if upper.contains("MP4 HD") {
        Some((MediaKind::Video, "hd"))
    } else if upper.contains("MP4") {
        Some((MediaKind::Video, "sd"))
    } else if upper.contains("MP3") {
        Some((MediaKind::Audio, "audio"))
    } else {
        None
    }
}

fn parse_fragment(fragment: &str) -> Result<DouyinVideo> {
    let doc = Html::parse_fragment(fragment);
    let caption = html::selector("h3")?;
    let img = html::selector("img")?;
    let links = html::selector("a")?;

    let thumbnail = html::doc_attr(&doc, &img, "src");
    let media = doc
        .select(&links)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            if !href.starts_with("http") {
                return None;
            }
            let (kind, quality) = classify(&html::text_of(a))?;
            Some(
                MediaItem::new(kind, href)
                    .quality(quality)
                    .thumbnail(thumbnail.clone()),
            )
        })
        .collect();

    Ok(DouyinVideo {
        caption: html::doc_text(&doc, &caption),
        thumbnail,
        original_url: String::new(),
        media,
    })
}
