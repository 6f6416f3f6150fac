//! Test helpers for relay-server.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod client;

pub use assertions::*;
pub use client::{TestClient, TestResponse};

use std::sync::Arc;
use std::time::Duration;

use relay_core::{ApiKeyEntry, KeyRateLimit, Settings};
use relay_server::{AppState, ServerConfig, SettingsStore, create_router};
use relay_sources::{ClientConfig, HttpClient, PollPolicy, Sources, UpstreamHosts};
use tempfile::TempDir;
use wiremock::MockServer;

pub const ADMIN_KEY: &str = "test-admin-secret";

/// A gateway wired to a wiremock upstream and a settings file in a temp dir.
pub struct TestApp {
    pub upstream: MockServer,
    pub state: AppState,
    pub client: TestClient,
    _dir: TempDir,
}

impl TestApp {
    pub async fn start() -> Self {
        Self::with_settings(Settings::default()).await
    }

    pub async fn with_settings(settings: Settings) -> Self {
        Self::build(settings, |_| {}).await
    }

    /// Builds the app, letting the caller adjust the server configuration.
    pub async fn build(settings: Settings, configure: impl FnOnce(&mut ServerConfig)) -> Self {
        let upstream = MockServer::start().await;
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, settings.to_json_pretty().expect("settings serialize"))
            .expect("settings written");

        let mut config = ServerConfig {
            settings_path: path.clone(),
            admin_key: Some(ADMIN_KEY.to_string()),
            ..ServerConfig::default()
        };
        configure(&mut config);

        let http = HttpClient::new(&ClientConfig::default().with_timeout(Duration::from_secs(5)))
            .expect("client builds");
        let sources = Sources::new(http, &UpstreamHosts::all_at(upstream.uri()))
            .with_poll_policy(PollPolicy::fixed(3, Duration::from_millis(10)));

        let store = Arc::new(SettingsStore::load(&path));
        let state = AppState::new(config, store, sources);
        let client = TestClient::new(create_router(state.clone(), None));

        Self {
            upstream,
            state,
            client,
            _dir: dir,
        }
    }

    /// Settings as currently stored on disk.
    pub fn settings_on_disk(&self) -> Settings {
        let raw = std::fs::read_to_string(self.state.settings().path()).expect("settings file");
        Settings::from_json(&raw).expect("settings parse")
    }
}

/// Settings with the API key gate on and a few keys.
pub fn keyed_settings() -> Settings {
    let mut settings = Settings::default();
    settings.api_settings.require_apikey = true;
    settings.api_settings.apikey.insert(
        "good-key".to_string(),
        ApiKeyEntry::new("Good", "free", KeyRateLimit::Limited(2)),
    );
    settings.api_settings.apikey.insert(
        "vip-key".to_string(),
        ApiKeyEntry::new("VIP", "premium", KeyRateLimit::Unlimited),
    );
    let mut disabled = ApiKeyEntry::new("Old", "free", KeyRateLimit::Limited(10));
    disabled.enabled = false;
    settings
        .api_settings
        .apikey
        .insert("old-key".to_string(), disabled);
    settings
}

/// Settings with a small IP rate limit.
pub fn limited_settings(max_requests: u32) -> Settings {
    let mut settings = Settings::default();
    settings.rate_limit.max_requests = max_requests;
    settings.rate_limit.window_ms = 60_000;
    settings
}
