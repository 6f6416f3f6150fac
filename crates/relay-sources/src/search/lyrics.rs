//! Lyrics search through the lrclib public API.

use serde_json::Value;
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::validate;

#[derive(Debug, Clone)]
pub struct Lyrics {
    http: HttpClient,
    base: String,
}

impl Lyrics {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    /// Returns lrclib's track list unchanged. An empty list is a 404.
    #[instrument(skip_all, fields(service = "lrclib"))]
    pub async fn search(&self, title: &str) -> Result<Vec<Value>> {
        let title = validate::non_empty(title, "q")?;

        let request = self
            .http
            .get(format!("{}/api/search", self.base))
            .query(&[("q", title)])
            .header(
                "referer",
                format!("{}/search/{}", self.base, urlencoding::encode(title)),
            );
        let tracks: Vec<Value> = self.http.json(request).await?;

        if tracks.is_empty() {
            return Err(SourceError::not_found(format!("No lyrics found for '{}'", title)));
        }
        Ok(tracks)
    }
}
