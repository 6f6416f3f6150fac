//! Relay Core - domain types shared by the gateway crates.
//!
//! - [`envelope`]: the `{status, code, result}` response shape
//! - [`settings`]: the runtime settings document and its validation
//! - [`catalog`]: static descriptions of every registered endpoint

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod settings;

pub use catalog::{Category, EndpointInfo, GET_POST, HttpMethod, ParamInfo};
pub use envelope::{Envelope, ErrorResult, failure};
pub use error::{Result, SettingsError};
pub use settings::{
    ApiKeyEntry, ApiSettings, CacheSettings, DEFAULT_MAINTENANCE_MESSAGE, KeyLookup, KeyRateLimit,
    MaintenanceSettings, RateLimitSettings, Settings,
};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
