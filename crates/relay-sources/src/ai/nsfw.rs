//! NSFW image classification through a public nyckel function.

use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::validate;

const FUNCTION_ID: &str = "o2f0jzcdyut2qxhu";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Invocation {
    label_name: Option<String>,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NsfwVerdict {
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct NsfwCheck {
    http: HttpClient,
    base: String,
}

impl NsfwCheck {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    #[instrument(skip_all, fields(service = "nyckel"))]
    pub async fn classify(&self, url: &str) -> Result<NsfwVerdict> {
        let url = validate::http_url(url, "url")?;

        let image = self.http.bytes(self.http.get(url)).await?;
        let request = self
            .http
            .post(format!("{}/v1/functions/{}/invoke", self.base, FUNCTION_ID))
            .header("x-requested-with", "XMLHttpRequest")
            .multipart(Form::new().part("file", image.image_part()?));
        let invocation: Invocation = self.http.json(request).await?;

        let label = invocation
            .label_name
            .ok_or_else(|| SourceError::parse("classifier returned no label"))?;

        Ok(NsfwVerdict {
            label,
            confidence: invocation.confidence,
        })
    }
}
