//! Pinterest pin downloader.
//!
//! Initializes a cookie session, then reads the pin from the internal
//! `PinResource` JSON endpoint. Short `pin.it` links are resolved by
//! following their redirect first.

use reqwest::Url;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::media::{MediaItem, MediaKind};
use crate::validate;

/// Image renditions, largest first, with the quality label they map to.
const IMAGE_SIZES: [(&str, &str); 5] = [
    ("orig", "original"),
    ("736x", "large"),
    ("474x", "medium"),
    ("236x", "small"),
    ("170x", "thumbnail"),
];

#[derive(Debug, Clone, Serialize)]
pub struct Pin {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: Option<String>,
    pub original_url: String,
    pub final_url: String,
    pub media_urls: Vec<MediaItem>,
}

#[derive(Debug, Clone)]
pub struct Pinterest {
    http: HttpClient,
    base: String,
}

impl Pinterest {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "pinterest"))]
    pub async fn download(&self, url: &str) -> Result<Pin> {
        let original = validate::http_url(url, "url")?;
        let host = original.host_str().unwrap_or_default();

        let final_url = if validate::host_matches(host, "pin.it") {
            self.resolve_short_link(&original).await?
        } else {
            original.clone()
        };

        let pin_id = pin_id(&final_url)
            .ok_or_else(|| SourceError::invalid("This is not a valid Pinterest link."))?;
        debug!(pin_id = %pin_id, "Resolved pin");

        let cookies = session_cookies(&self.http, &self.base).await?;
        let data = json!({
            "options": { "field_set_key": "detailed", "id": pin_id },
            "context": {},
        })
        .to_string();
        let now = chrono::Utc::now().timestamp_millis().to_string();

        let request = self
            .http
            .get(format!("{}/resource/PinResource/get/", self.base))
            .query(&[
                ("source_url", format!("/pin/{}/", pin_id)),
                ("data", data),
                ("_", now),
            ])
            .header("accept", "application/json, text/javascript, */*, q=0.01")
            .header("referer", format!("{}/", self.base))
            .header("cookie", cookies)
            .header("x-app-version", "f1222d7")
            .header("x-pinterest-appstate", "active")
            .header("x-pinterest-pws-handler", "www/[username]/[slug].js")
            .header("x-requested-with", "XMLHttpRequest");
        let body: Value = self.http.json(request).await?;

        let pin = body
            .pointer("/resource_response/data")
            .filter(|v| v.is_object())
            .ok_or_else(|| SourceError::not_found("Pin not found."))?;

        let media_urls = media_from_pin(pin);
        if media_urls.is_empty() {
            return Err(SourceError::not_found("No media found for this pin."));
        }

        Ok(Pin {
            id: str_at(pin, "/id").unwrap_or_else(|| pin_id.clone()),
            title: str_at(pin, "/title")
                .or_else(|| str_at(pin, "/grid_title"))
                .unwrap_or_default(),
            description: str_at(pin, "/description").unwrap_or_default(),
            created_at: str_at(pin, "/created_at"),
            original_url: original.to_string(),
            final_url: final_url.to_string(),
            media_urls,
        })
    }

    async fn resolve_short_link(&self, url: &Url) -> Result<Url> {
        let response = self.http.send(self.http.get(url.clone())).await?;
        Ok(response.url().clone())
    }
}

/// Fetches the landing page and returns its cookies as a `Cookie` value.
pub(crate) async fn session_cookies(http: &HttpClient, base: &str) -> Result<String> {
    let (_, cookies) = http
        .text_with_cookies(http.get(format!("{}/", base)))
        .await?;
    Ok(cookies)
}

/// Extracts the pin id from `https://<sub>.pinterest.<tld>/pin/<id>/`.
fn pin_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if !host.split('.').any(|label| label == "pinterest") {
        return None;
    }
    let mut segments = url.path_segments()?;
    segments.find(|s| *s == "pin")?;
    segments
        .next()
        .filter(|id| !id.is_empty())
        .map(String::from)
}

fn str_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn u64_at(value: &Value, pointer: &str) -> Option<u64> {
    value.pointer(pointer).and_then(Value::as_u64)
}

fn media_from_pin(pin: &Value) -> Vec<MediaItem> {
    let mut media = Vec::new();
    let orig_url = str_at(pin, "/images/orig/url");

    if let Some(list) = pin.pointer("/videos/video_list").and_then(Value::as_object) {
        // Prefer a progressive mp4; otherwise rewrite the HLS playlist URL.
        let chosen = list
            .iter()
            .find(|(_, v)| v["url"].as_str().is_some_and(|u| u.ends_with(".mp4")))
            .or_else(|| list.iter().next());

        if let Some((key, video)) = chosen
            && let Some(mut url) = str_at(video, "/url")
        {
            if key.contains("HLS") && url.contains("m3u8") {
                url = url.replace("hls", "720p").replace("m3u8", "mp4");
            }
            let width = u64_at(video, "/width");
            let height = u64_at(video, "/height");
            let mut item = MediaItem::new(MediaKind::Video, url)
                .size(width, height)
                .duration(pin.pointer("/videos/duration").and_then(Value::as_f64))
                .thumbnail(str_at(video, "/thumbnail").or_else(|| orig_url.clone()));
            if let (Some(w), Some(h)) = (width, height) {
                item = item.quality(format!("{}x{}", w, h));
            }
            media.push(item);
        }
    }

    if pin.pointer("/embed/type").and_then(Value::as_str) == Some("gif")
        && let Some(src) = str_at(pin, "/embed/src")
    {
        media.push(
            MediaItem::new(MediaKind::Gif, src)
                .quality("original")
                .size(
                    u64_at(pin, "/embed/width").or_else(|| u64_at(pin, "/images/orig/width")),
                    u64_at(pin, "/embed/height").or_else(|| u64_at(pin, "/images/orig/height")),
                )
                .thumbnail(orig_url.clone()),
        );
    }

    for (key, quality) in IMAGE_SIZES {
        let Some(image) = pin.pointer(&format!("/images/{}", key)) else {
            continue;
        };
        if let Some(url) = str_at(image, "/url") {
            media.push(
                MediaItem::new(MediaKind::Image, url)
                    .quality(quality)
                    .size(u64_at(image, "/width"), u64_at(image, "/height")),
            );
        }
    }

    media
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_id() {
        let url = Url::parse("https://id.pinterest.com/pin/123456789/?nic=1").unwrap();
        assert_eq!(pin_id(&url).as_deref(), Some("123456789"));

        let url = Url::parse("https://www.pinterest.co.uk/pin/98765/").unwrap();
        assert_eq!(pin_id(&url).as_deref(), Some("98765"));

        let url = Url::parse("https://www.pinterest.com/ideas/").unwrap();
        assert_eq!(pin_id(&url), None);

        let url = Url::parse("https://example.com/pin/1/").unwrap();
        assert_eq!(pin_id(&url), None);
    }

    #[test]
    fn test_hls_video_is_rewritten() {
        let pin = json!({
            "videos": {
                "duration": 12000,
                "video_list": {
                    "V_HLSV4": {"url": "https://v1.pinimg.com/videos/hls/ab.m3u8", "width": 720, "height": 1280}
                }
            },
            "images": {"orig": {"url": "https://i.pinimg.com/originals/ab.jpg", "width": 720, "height": 1280}}
        });

        let media = media_from_pin(&pin);
        assert_eq!(media[0].url, "https://v1.pinimg.com/videos/720p/ab.mp4");
        assert_eq!(media[0].quality.as_deref(), Some("720x1280"));
        assert_eq!(media[0].thumbnail.as_deref(), Some("https://i.pinimg.com/originals/ab.jpg"));
        assert_eq!(media[1].quality.as_deref(), Some("original"));
    }

    #[test]
    fn test_images_in_size_order() {
        let pin = json!({
            "images": {
                "236x": {"url": "https://i/236.jpg"},
                "orig": {"url": "https://i/orig.jpg"},
                "736x": {"url": "https://i/736.jpg"}
            }
        });

        let qualities: Vec<_> = media_from_pin(&pin)
            .into_iter()
            .filter_map(|m| m.quality)
            .collect();
        assert_eq!(qualities, vec!["original", "large", "small"]);
    }
}
