//! Relay Server - HTTP gateway in front of third-party media, search and AI
//! services.
//!
//! Every request passes the same gates (maintenance, rate limit, API key),
//! integration responses are cached by path and query, and a small admin API
//! under `/manage` edits the settings file at runtime.

pub mod cache;
pub mod config;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod settings_store;
pub mod state;
pub mod stats;
pub mod tasks;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use server::{create_router, run_server};
pub use settings_store::SettingsStore;
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
