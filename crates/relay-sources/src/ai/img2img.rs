//! Prompt-driven image editing through nanana.
//!
//! Upload the source image, submit the generation request, then poll for
//! the result.

use std::time::Duration;

use reqwest::RequestBuilder;
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::poll::{Attempt, PollPolicy, poll_until};
use crate::validate;

#[derive(Debug, Deserialize)]
struct Uploaded {
    #[serde(default)]
    success: bool,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Submitted {
    #[serde(default)]
    success: bool,
    request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedImage {
    pub prompt: String,
    pub source_image_url: String,
    pub generated_image_url: String,
}

#[derive(Debug, Clone)]
pub struct ImageToImage {
    http: HttpClient,
    base: String,
    policy: PollPolicy,
}

impl ImageToImage {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
            policy: PollPolicy::fixed(20, Duration::from_secs(5)),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Each request carries a fresh browser fingerprint id.
    fn headers(&self, request: RequestBuilder) -> RequestBuilder {
        let fp: [u8; 16] = rand::random();
        let fp_id: String = fp.iter().map(|b| format!("{:02x}", b)).collect();
        request
            .header("accept", "*/*")
            .header("x-fp-id", fp_id)
            .header("referer", format!("{}/", self.base))
    }

    #[instrument(skip_all, fields(service = "nanana"))]
    pub async fn generate(&self, url: &str, prompt: &str) -> Result<GeneratedImage> {
        let url = validate::http_url(url, "url")?;
        let prompt = validate::non_empty(prompt, "prompt")?;

        let image = self.http.bytes(self.http.get(url)).await?;
        let upload = self.headers(
            self.http
                .post(format!("{}/api/upload-img", self.base))
                .multipart(Form::new().part("image", image.image_part()?)),
        );
        let uploaded: Uploaded = self.http.json(upload).await?;
        let source_image_url = match uploaded.url {
            Some(url) if uploaded.success => url,
            _ => return Err(SourceError::upstream("nanana", "source image upload failed")),
        };

        let submit = self.headers(
            self.http
                .post(format!("{}/api/image-to-image", self.base))
                .json(&json!({ "prompt": prompt, "image_urls": [source_image_url] })),
        );
        let submitted: Submitted = self.http.json(submit).await?;
        let request_id = match submitted.request_id {
            Some(id) if submitted.success => id,
            _ => return Err(SourceError::upstream("nanana", "generation request rejected")),
        };
        info!(request_id = %request_id, "Generation submitted");

        let id = request_id.as_str();
        let generated_image_url = poll_until(&self.policy, |_| self.result(id)).await?;

        Ok(GeneratedImage {
            prompt: prompt.to_string(),
            source_image_url,
            generated_image_url,
        })
    }

    async fn result(&self, request_id: &str) -> Result<Attempt<String>> {
        let request = self.headers(
            self.http
                .post(format!("{}/api/get-result", self.base))
                .json(&json!({ "requestId": request_id, "type": "image-to-image" })),
        );
        let body: Value = self.http.json(request).await?;

        let completed = body["completed"].as_bool().unwrap_or(false);
        let url = body
            .pointer("/data/images/0/url")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(match url {
            Some(url) if completed => Attempt::Ready(url),
            _ => Attempt::Pending,
        })
    }
}
