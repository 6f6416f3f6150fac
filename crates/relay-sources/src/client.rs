//! Shared outbound HTTP client.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, SET_COOKIE};
use reqwest::multipart::Part;
use reqwest::{IntoUrl, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, SourceError};

/// Browser-like user agent sent when an integration does not set its own.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Default User-Agent header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Binary payload plus the content type the upstream reported.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// Thin wrapper over `reqwest::Client` that maps failures to [`SourceError`].
///
/// Cloning is cheap; every integration holds its own clone.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Builds a client with the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;

        Ok(Self {
            inner,
            timeout: config.timeout,
        })
    }

    /// Per-request timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        self.inner.get(url)
    }

    pub fn post(&self, url: impl IntoUrl) -> RequestBuilder {
        self.inner.post(url)
    }

    /// Sends the request and rejects non-2xx answers.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Upstream responded");

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: strip_query(response.url()),
            });
        }
        Ok(response)
    }

    /// Sends the request and decodes a JSON body.
    pub async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;
        serde_json::from_slice(&bytes).map_err(|e| SourceError::parse(e.to_string()))
    }

    /// Sends the request and returns the body as text.
    pub async fn text(&self, request: RequestBuilder) -> Result<String> {
        let response = self.send(request).await?;
        response.text().await.map_err(|e| self.map_error(e))
    }

    /// Sends the request and returns the body as text alongside the
    /// `Set-Cookie` values folded into a single `Cookie` header value.
    pub async fn text_with_cookies(&self, request: RequestBuilder) -> Result<(String, String)> {
        let response = self.send(request).await?;
        let cookies = cookie_header(response.headers());
        let body = response.text().await.map_err(|e| self.map_error(e))?;
        Ok((body, cookies))
    }

    /// Downloads a binary body.
    pub async fn bytes(&self, request: RequestBuilder) -> Result<Fetched> {
        let response = self.send(request).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(Fetched {
            bytes,
            content_type,
        })
    }

    fn map_error(&self, err: reqwest::Error) -> SourceError {
        if err.is_timeout() {
            return SourceError::Timeout {
                seconds: self.timeout.as_secs(),
            };
        }
        if err.is_decode() {
            return SourceError::parse(err.to_string());
        }
        SourceError::Http(err.without_url().to_string())
    }
}

impl Fetched {
    /// Wraps the payload as a multipart file named `image.jpg`.
    pub fn image_part(&self) -> Result<Part> {
        let mime = self
            .content_type
            .as_deref()
            .filter(|ct| ct.starts_with("image/"))
            .unwrap_or("image/jpeg");
        Part::bytes(self.bytes.to_vec())
            .file_name("image.jpg")
            .mime_str(mime)
            .map_err(|e| SourceError::Http(e.to_string()))
    }
}

/// Folds `Set-Cookie` headers into `name=value; name2=value2`.
pub fn cookie_header(headers: &HeaderMap) -> String {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

fn strip_query(url: &reqwest::Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_cookie_header_keeps_name_value_pairs() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("csrftoken=abc; Path=/; Secure"),
        );
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("_pinterest_sess=xyz; HttpOnly"),
        );

        assert_eq!(cookie_header(&headers), "csrftoken=abc; _pinterest_sess=xyz");
    }

    #[test]
    fn test_cookie_header_empty() {
        assert_eq!(cookie_header(&HeaderMap::new()), "");
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("relay-test");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "relay-test");

        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_strip_query_hides_parameters() {
        let url = reqwest::Url::parse("https://www.tikwm.com/api/?url=secret").unwrap();
        assert_eq!(strip_query(&url), "https://www.tikwm.com/api/");
    }
}
