//! Text extraction from an image URL.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::validate;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OcrResponse {
    #[serde(default)]
    extracted_text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OcrResult {
    pub extracted_text: String,
}

#[derive(Debug, Clone)]
pub struct Ocr {
    http: HttpClient,
    base: String,
}

impl Ocr {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "ocr"))]
    pub async fn extract(&self, url: &str) -> Result<OcrResult> {
        let url = validate::http_url(url, "url")?;

        let request = self
            .http
            .post(format!("{}/api/ocr/process", self.base))
            .json(&json!({ "imageUrl": url.as_str() }));
        let response: OcrResponse = self.http.json(request).await?;

        let extracted_text = response
            .extracted_text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SourceError::not_found("No text could be extracted from the image"))?;

        Ok(OcrResult { extracted_text })
    }
}
