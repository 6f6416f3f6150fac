//! YouTube search by scraping the `ytInitialData` blob of the results page.

use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::validate;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

const DATA_MARKERS: [&str; 2] = ["var ytInitialData = ", "window[\"ytInitialData\"] = "];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoutubeVideo {
    pub title: String,
    pub description: String,
    pub url: String,
    pub duration: Option<String>,
    pub views: Option<u64>,
    pub ago: Option<String>,
    pub author: String,
    pub thumbnail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct YoutubeResults {
    pub query: String,
    pub count: usize,
    pub videos: Vec<YoutubeVideo>,
}

#[derive(Debug, Clone)]
pub struct YoutubeSearch {
    http: HttpClient,
    base: String,
}

impl YoutubeSearch {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    /// Searches videos; `limit` is clamped to `1..=MAX_LIMIT`.
    #[instrument(skip_all, fields(service = "youtube"))]
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<YoutubeResults> {
        let query = validate::non_empty(query, "query")?;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let request = self
            .http
            .get(format!("{}/results", self.base))
            .query(&[("search_query", query), ("hl", "en")])
            .header("accept-language", "en-US,en;q=0.9");
        let page = self.http.text(request).await?;

        let data = initial_data(&page)?;
        let mut videos = Vec::new();
        collect_videos(&data, &mut videos, limit);

        if videos.is_empty() {
            return Err(SourceError::not_found("No results found"));
        }

        Ok(YoutubeResults {
            query: query.to_string(),
            count: videos.len(),
            videos,
        })
    }
}

/// Reads the first JSON value that follows the `ytInitialData` assignment.
fn initial_data(page: &str) -> Result<Value> {
    let start = DATA_MARKERS
        .iter()
        .find_map(|marker| page.find(marker).map(|i| i + marker.len()))
        .ok_or_else(|| SourceError::parse("ytInitialData not found in results page"))?;

    serde_json::Deserializer::from_str(&page[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| SourceError::parse("ytInitialData is empty"))?
        .map_err(|e| SourceError::parse(format!("ytInitialData: {}", e)))
}

fn collect_videos(node: &Value, out: &mut Vec<YoutubeVideo>, limit: usize) {
    if out.len() >= limit {
        return;
    }
    match node {
        Value::Object(map) => {
            if let Some(renderer) = map.get("videoRenderer") {
                if let Some(video) = video_from_renderer(renderer) {
                    out.push(video);
                }
                return;
            }
            for value in map.values() {
                collect_videos(value, out, limit);
            }
        },
        Value::Array(items) => {
            for value in items {
                collect_videos(value, out, limit);
            }
        },
        _ => {},
    }
}

fn runs_text(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if let Some(simple) = value.get("simpleText").and_then(Value::as_str) {
        return Some(simple.to_string());
    }
    let text: String = value
        .get("runs")?
        .as_array()?
        .iter()
        .filter_map(|run| run.get("text").and_then(Value::as_str))
        .collect();
    Some(text)
}

fn video_from_renderer(renderer: &Value) -> Option<YoutubeVideo> {
    let id = renderer.get("videoId")?.as_str()?;

    let description = runs_text(renderer.get("descriptionSnippet"))
        .or_else(|| {
            runs_text(renderer.pointer("/detailedMetadataSnippets/0/snippetText"))
        })
        .unwrap_or_default();

    let views = runs_text(renderer.get("viewCountText")).and_then(|text| {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        digits.parse().ok()
    });

    Some(YoutubeVideo {
        title: runs_text(renderer.get("title")).unwrap_or_default(),
        description,
        url: format!("https://youtube.com/watch?v={}", id),
        duration: runs_text(renderer.get("lengthText")),
        views,
        ago: runs_text(renderer.get("publishedTimeText")),
        author: runs_text(renderer.get("ownerText")).unwrap_or_default(),
        thumbnail: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
    })
}
