//! Web-to-Android app builds through appmaker.
//!
//! The flow is create, upload icon and splash, build, poll status, then
//! fetch the download info.

use std::time::Duration;

use reqwest::RequestBuilder;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::client::HttpClient;
use crate::error::{Result, SourceError};
use crate::poll::{Attempt, PollPolicy, poll_until};
use crate::validate;

const ORIGIN: &str = "https://create.appmaker.xyz";

/// Parameters of a build request.
#[derive(Debug, Clone, Default)]
pub struct AppRequest {
    pub url: String,
    pub email: String,
    pub app_name: String,
    pub icon: String,
    pub splash: String,
}

impl AppRequest {
    /// Checks every field before anything is sent upstream.
    pub fn validate(&self) -> Result<()> {
        validate::http_url(&self.url, "url")?;
        let email = validate::non_empty(&self.email, "email")?;
        if !email.contains('@') {
            return Err(SourceError::invalid("Parameter 'email' must be an email address"));
        }
        validate::non_empty(&self.app_name, "appName")?;
        validate::http_url(&self.icon, "icon")?;
        validate::http_url(&self.splash, "splash")?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct Body<T> {
    body: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Created {
    app_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Uploaded {
    cloud_storage_public_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuildStatus {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Clone)]
pub struct Appmaker {
    http: HttpClient,
    base: String,
    policy: PollPolicy,
}

impl Appmaker {
    pub fn new(http: HttpClient, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
            policy: PollPolicy::fixed(30, Duration::from_secs(10))
                .with_initial_delay(Duration::from_secs(10)),
        }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("accept", "application/json, text/plain, */*")
            .header("origin", ORIGIN)
            .header("referer", format!("{}/", ORIGIN))
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        self.http.json(self.headers(request)).await
    }

    /// Runs the full build and returns appmaker's download info.
    #[instrument(skip_all, fields(service = "appmaker", app = %req.app_name))]
    pub async fn build(&self, req: &AppRequest) -> Result<Value> {
        req.validate()?;

        let created: Body<Created> = self
            .call(
                self.http
                    .post(format!("{}/webapp/build", self.base))
                    .json(&json!({ "url": req.url.trim(), "email": req.email.trim() })),
            )
            .await?;
        let app_id = created
            .body
            .and_then(|b| b.app_id)
            .ok_or_else(|| SourceError::upstream("appmaker", "create returned no appId"))?;
        info!(app_id = %app_id, "App created");

        let icon = self.upload(&app_id, &req.icon).await?;
        let splash = self.upload(&app_id, &req.splash).await?;

        let _: Value = self
            .call(
                self.http
                    .post(format!("{}/webapp/build/build", self.base))
                    .json(&json!({
                        "appId": app_id,
                        "appIcon": icon,
                        "appName": req.app_name.trim(),
                        "isPaymentInProgress": false,
                        "enableShowToolBar": true,
                        "toolbarColor": "#03A9F4",
                        "toolbarTitleColor": "#FFFFFF",
                        "splashIcon": splash,
                    })),
            )
            .await?;

        let id = app_id.as_str();
        poll_until(&self.policy, |_| self.status(id)).await?;

        let download: Body<Value> = self
            .call(
                self.http
                    .get(format!("{}/webapp/complete/download", self.base))
                    .query(&[("appId", id)]),
            )
            .await?;
        download
            .body
            .ok_or_else(|| SourceError::upstream("appmaker", "download info missing"))
    }

    async fn upload(&self, app_id: &str, file_url: &str) -> Result<String> {
        let form = Form::new()
            .text("file", file_url.trim().to_string())
            .text("id", app_id.to_string());
        let uploaded: Uploaded = self
            .call(
                self.http
                    .post(format!("{}/webapp/build/file-upload", self.base))
                    .multipart(form),
            )
            .await?;
        uploaded
            .cloud_storage_public_url
            .ok_or_else(|| SourceError::upstream("appmaker", "file upload returned no URL"))
    }

    async fn status(&self, app_id: &str) -> Result<Attempt<()>> {
        let status: Body<BuildStatus> = self
            .call(
                self.http
                    .get(format!("{}/webapp/build/status", self.base))
                    .query(&[("appId", app_id)]),
            )
            .await?;

        match status.body.map(|b| b.status).as_deref() {
            Some("success") => Ok(Attempt::Ready(())),
            Some("failed") => Err(SourceError::JobFailed("app build failed".into())),
            _ => Ok(Attempt::Pending),
        }
    }
}
