//! Relay gateway binary.

use std::net::SocketAddr;

use anyhow::Context;
use relay_server::{AppState, ServerConfig, metrics::init_metrics, run_server};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load().context("Failed to load server configuration")?;
    let state = AppState::from_config(config).context("Failed to build upstream client")?;

    let settings = state.settings().snapshot();
    let port = state.config().effective_port(settings.port);
    let addr: SocketAddr = format!("{}:{}", state.config().host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", state.config().host, port))?;

    tracing::info!("Starting {} v{}", settings.name, relay_server::version());
    tracing::info!("Settings file: {}", state.settings().path().display());
    tracing::info!(
        require_apikey = settings.api_settings.require_apikey,
        maintenance = settings.maintenance.enabled,
        keys = settings.api_settings.apikey.len(),
        "Gates configured"
    );
    if state.config().admin_key().is_none() {
        tracing::warn!("No admin key configured, /manage mutations are disabled");
    }

    let prometheus_handle = init_metrics();

    run_server(addr, state, Some(prometheus_handle)).await?;

    Ok(())
}
