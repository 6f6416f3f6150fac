//! Image upscaling through imglarger: upload, then poll the job status.

use std::time::Duration;

use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::poll::{Attempt, PollPolicy, poll_until};
use crate::validate;

pub const DEFAULT_SCALE: u8 = 2;
pub const SCALES: [u8; 2] = [2, 4];

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct Uploaded {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobStatus {
    #[serde(default)]
    status: String,
    #[serde(default, rename = "originalfilename")]
    original_filename: Option<String>,
    #[serde(default)]
    download_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpscaleResult {
    pub original_filename: Option<String>,
    pub scale_factor: u8,
    pub download_url: String,
}

#[derive(Debug, Clone)]
pub struct Upscaler {
    http: HttpClient,
    base: String,
    policy: PollPolicy,
}

impl Upscaler {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
            policy: PollPolicy::fixed(40, Duration::from_secs(3))
                .with_initial_delay(Duration::from_secs(3)),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parses the `scale` parameter; only 2 and 4 are supported.
    pub fn parse_scale(raw: Option<&str>) -> Result<u8> {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(DEFAULT_SCALE);
        };
        raw.parse::<u8>()
            .ok()
            .filter(|s| SCALES.contains(s))
            .ok_or_else(|| SourceError::invalid("Parameter 'scale' must be 2 or 4"))
    }

    #[instrument(skip_all, fields(service = "imglarger", scale = scale))]
    pub async fn upscale(&self, url: &str, scale: u8) -> Result<UpscaleResult> {
        let url = validate::http_url(url, "url")?;
        if !SCALES.contains(&scale) {
            return Err(SourceError::invalid("Parameter 'scale' must be 2 or 4"));
        }

        let image = self.http.bytes(self.http.get(url)).await?;
        let part = image.image_part()?;

        let upload = self
            .http
            .post(format!("{}/api/UpscalerNew/UploadNew", self.base))
            .multipart(Form::new().part("file", part));
        let uploaded: Envelope<Uploaded> = self.http.json(upload).await?;
        let code = uploaded
            .data
            .and_then(|d| d.code)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| SourceError::upstream("imglarger", "upload returned no job code"))?;
        info!(code = %code, "Upscale job submitted");

        let code = code.as_str();
        let status = poll_until(&self.policy, |_| self.check(code, scale)).await?;

        let download_url = status
            .download_urls
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::parse("finished job has no download URL"))?;

        Ok(UpscaleResult {
            original_filename: status.original_filename,
            scale_factor: scale,
            download_url,
        })
    }

    async fn check(&self, code: &str, scale: u8) -> Result<Attempt<JobStatus>> {
        let request = self
            .http
            .post(format!("{}/api/UpscalerNew/CheckStatusNew", self.base))
            .json(&json!({ "code": code, "scaleRadio": scale }));
        let response: Envelope<JobStatus> = self.http.json(request).await?;

        match response.data {
            Some(status) if status.status == "success" => Ok(Attempt::Ready(status)),
            Some(status) if status.status == "failed" => {
                Err(SourceError::JobFailed("upscale failed on the server".into()))
            },
            _ => Ok(Attempt::Pending),
        }
    }
}
