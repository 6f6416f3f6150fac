//! Pinterest image search by scraping the search results page.

use rand::seq::SliceRandom;
use scraper::Html;
use serde::Serialize;
use tracing::{instrument, warn};

use crate::client::HttpClient;
use crate::downloader::session_cookies;
use crate::error::{Result, SourceError};
use crate::html;
use crate::validate;

/// Images returned per search.
pub const SAMPLE_SIZE: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct PinterestImages {
    pub query: String,
    pub count: usize,
    pub images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PinterestSearch {
    http: HttpClient,
    base: String,
}

impl PinterestSearch {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "pinterest"))]
    pub async fn search(&self, query: &str) -> Result<PinterestImages> {
        let query = validate::non_empty(query, "q")?;

        // Search still answers without a session, just with fewer results.
        let cookies = match session_cookies(&self.http, &self.base).await {
            Ok(cookies) => cookies,
            Err(e) => {
                warn!(error = %e, "Could not initialize Pinterest session");
                String::new()
            },
        };

        let request = self
            .http
            .get(format!("{}/search/pins/", self.base))
            .query(&[("autologin", "true"), ("q", query)])
            .header("cookie", cookies);
        let page = self.http.text(request).await?;

        let images = sample(image_links(&page)?);
        if images.is_empty() {
            return Err(SourceError::not_found("No images found."));
        }

        Ok(PinterestImages {
            query: query.to_string(),
            count: images.len(),
            images,
        })
    }
}

/// Image sources of pin links, upgraded from the 236px to the 736px rendition.
fn image_links(page: &str) -> Result<Vec<String>> {
    let doc = Html::parse_document(page);
    let pin_img = html::selector("div > a img")?;

    Ok(doc
        .select(&pin_img)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| src.starts_with("http"))
        .map(|src| src.replace("236", "736"))
        .collect())
}

fn sample(mut links: Vec<String>) -> Vec<String> {
    links.dedup();
    links.shuffle(&mut rand::thread_rng());
    links.truncate(SAMPLE_SIZE);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_links_upgrade_size() {
        let page = r#"<html><body>
            <div><a href="/pin/1/"><img src="https://i.pinimg.com/236x/aa/bb.jpg"></a></div>
            <div><a href="/pin/2/"><img src="https://i.pinimg.com/236x/cc/dd.jpg"></a></div>
            <div><span><img src="https://s.pinimg.com/logo.png"></span></div>
        </body></html>"#;

        let links = image_links(page).unwrap();
        assert_eq!(
            links,
            vec![
                "https://i.pinimg.com/736x/aa/bb.jpg",
                "https://i.pinimg.com/736x/cc/dd.jpg"
            ]
        );
    }

    #[test]
    fn test_sample_caps_size() {
        let links: Vec<String> = (0..12).map(|i| format!("https://i/{}.jpg", i)).collect();
        let picked = sample(links.clone());

        assert_eq!(picked.len(), SAMPLE_SIZE);
        assert!(picked.iter().all(|p| links.contains(p)));
    }
}
