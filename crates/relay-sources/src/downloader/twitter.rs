//! X/Twitter downloader backed by x2twitter.
//!
//! Two steps: fetch a verification token, then submit the search form and
//! scrape the returned HTML fragment.

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::html;
use crate::validate;

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TweetDownload {
    pub quality: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TweetMedia {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub original_url: String,
    pub downloads: Vec<TweetDownload>,
}

#[derive(Debug, Clone)]
pub struct Twitter {
    http: HttpClient,
    base: String,
}

impl Twitter {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "x2twitter"))]
    pub async fn download(&self, url: &str) -> Result<TweetMedia> {
        let url = validate::url_for(url, &["twitter.com", "x.com"], "X/Twitter")?;

        let verify = self
            .http
            .post(format!("{}/api/userverify", self.base))
            .form(&[("url", url.as_str())]);
        let token = self
            .http
            .json::<VerifyResponse>(verify)
            .await?
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SourceError::upstream("x2twitter", "verification token missing"))?;

        let search = self
            .http
            .post(format!("{}/api/ajaxSearch", self.base))
            .form(&[("q", url.as_str()), ("lang", "id"), ("cftoken", token.as_str())]);
        let response: SearchResponse = self.http.json(search).await?;

        let fragment = match response.data {
            Some(html) if response.status == "ok" => html,
            _ => return Err(SourceError::not_found("Tweet media not found")),
        };

        let mut media = parse_fragment(&fragment)?;
        if media.downloads.is_empty() {
            return Err(SourceError::not_found("No downloadable media in this tweet"));
        }
        media.original_url = url.to_string();
        Ok(media)
    }
}

fn parse_fragment(fragment: &str) -> Result<TweetMedia> {
    let doc = Html::parse_fragment(fragment);
    let links = html::selector(".dl-action a")?;
    let title = html::selector(".tw-middle h3")?;
    let thumb = html::selector(".thumbnail img")?;

    let downloads = doc
        .select(&links)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            if href.is_empty() || href == "#" {
                return None;
            }
            let quality = html::text_of(a).replace("Download ", "").trim().to_string();
            Some(TweetDownload {
                quality,
                url: href.to_string(),
            })
        })
        .collect();

    Ok(TweetMedia {
        title: html::doc_text(&doc, &title),
        thumbnail: html::doc_attr(&doc, &thumb, "src"),
        original_url: String::new(),
        downloads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let fragment = r##"
            <div class="thumbnail"><img src="https://pbs/thumb.jpg"></div>
            <div class="tw-middle"><h3>Launch day</h3></div>
            <div class="dl-action">
                <p><a href="https://dl/720.mp4">Download MP4 (720p)</a></p>
                <p><a href="https://dl/360.mp4">Download MP4 (360p)</a></p>
                <p><a href="#">Download MP3</a></p>
            </div>
        "##;

        let media = parse_fragment(fragment).unwrap();
        assert_eq!(media.title.as_deref(), Some("Launch day"));
        assert_eq!(media.thumbnail.as_deref(), Some("https://pbs/thumb.jpg"));
        assert_eq!(
            media.downloads,
            vec![
                TweetDownload {
                    quality: "MP4 (720p)".into(),
                    url: "https://dl/720.mp4".into()
                },
                TweetDownload {
                    quality: "MP4 (360p)".into(),
                    url: "https://dl/360.mp4".into()
                },
            ]
        );
    }
}
