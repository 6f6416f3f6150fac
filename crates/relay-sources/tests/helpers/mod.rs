//! Test helpers for relay-sources: a wiremock server standing in for every
//! upstream.

#![allow(dead_code, unused_imports)]

use std::time::Duration;

use relay_sources::{ClientConfig, HttpClient, PollPolicy, Sources, UpstreamHosts};
use wiremock::MockServer;

/// Mock server plus a registry whose every upstream points at it.
pub struct MockUpstream {
    pub server: MockServer,
    pub sources: Sources,
}

impl MockUpstream {
    pub async fn start() -> Self {
        Self::start_with(ClientConfig::default().with_timeout(Duration::from_secs(5))).await
    }

    pub async fn start_with(config: ClientConfig) -> Self {
        let server = MockServer::start().await;
        let http = HttpClient::new(&config).expect("client builds");
        let sources = Sources::new(http, &UpstreamHosts::all_at(server.uri()))
            .with_poll_policy(fast_poll(3));

        Self { server, sources }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }
}

/// Polling policy with millisecond delays.
pub fn fast_poll(max_attempts: u32) -> PollPolicy {
    PollPolicy::fixed(max_attempts, Duration::from_millis(10))
}

/// Minimal JPEG header bytes for image fixtures.
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
