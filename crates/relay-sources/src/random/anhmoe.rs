//! Random post from an anh.moe category listing.

use reqwest::Url;
use scraper::Html;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::html;

pub const CATEGORIES: [&str; 7] = [
    "sfw",
    "nsfw",
    "video-gore",
    "video-nsfw",
    "moe",
    "ai-picture",
    "hentai",
];

#[derive(Debug, Clone, Serialize)]
pub struct AnhmoePost {
    pub title: Option<String>,
    pub uploader: String,
    pub view_link: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct Anhmoe {
    http: HttpClient,
    base: String,
}

impl Anhmoe {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip(self), fields(service = "anhmoe"))]
    pub async fn random(&self, category: &str) -> Result<AnhmoePost> {
        let category = category.trim();
        if !CATEGORIES.contains(&category) {
            return Err(SourceError::invalid(format!(
                "Invalid category: {}. Valid options: {}",
                category,
                CATEGORIES.join(", ")
            )));
        }

        let request = self
            .http
            .get(format!("{}/category/{}", self.base, category))
            .header("origin", &self.base)
            .header("referer", format!("{}/", self.base));
        let page = self.http.text(request).await?;

        let mut posts = parse_posts(&page, &self.base)?;
        if posts.is_empty() {
            return Err(SourceError::not_found("No items found in this category"));
        }
        let index = rand::random::<usize>() % posts.len();
        Ok(posts.swap_remove(index))
    }
}

fn parse_posts(page: &str, base: &str) -> Result<Vec<AnhmoePost>> {
    let doc = Html::parse_document(page);
    let item = html::selector(".list-item")?;
    let title_link = html::selector(".list-item-desc-title a")?;
    let image_link = html::selector(".list-item-image a")?;
    let uploader = html::selector(".list-item-desc-title div")?;
    let base = Url::parse(base).ok();

    Ok(doc
        .select(&item)
        .map(|el| {
            let data = el
                .value()
                .attr("data-object")
                .and_then(|raw| urlencoding::decode(raw).ok())
                .and_then(|json| serde_json::from_str::<Value>(&json).ok())
                .unwrap_or(Value::Null);

            let view_link = html::first_attr(el, &image_link, "href").and_then(|href| {
                base.as_ref()
                    .and_then(|b| b.join(&href).ok())
                    .map(|u| u.to_string())
            });

            AnhmoePost {
                title: html::first_attr(el, &title_link, "title")
                    .or_else(|| data["title"].as_str().map(String::from)),
                uploader: html::first_text(el, &uploader).unwrap_or_default(),
                view_link,
                kind: data["type"].as_str().map(String::from),
                metadata: metadata(&data),
            }
        })
        .collect())
}

fn metadata(data: &Value) -> Map<String, Value> {
    let mut meta = data["image"].as_object().cloned().unwrap_or_default();
    meta.insert("width".into(), data["width"].clone());
    meta.insert("height".into(), data["height"].clone());
    meta.insert("size".into(), data["size_formatted"].clone());
    meta.insert("uploaded".into(), data["how_long_ago"].clone());
    meta
}
