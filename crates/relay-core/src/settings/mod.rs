//! Runtime settings document.
//!
//! The gateway reads a JSON file (camelCase keys) at startup and the admin
//! API rewrites it in place. Sections that are missing fall back to their
//! defaults, and top-level keys this crate does not model are preserved in
//! [`Settings::extra`] so a rewrite never drops them.

mod apikey;

pub use apikey::{ApiKeyEntry, KeyLookup, KeyRateLimit};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SettingsError};

/// Message shown while maintenance mode is on and no custom text was given.
pub const DEFAULT_MAINTENANCE_MESSAGE: &str =
    "API is currently under maintenance. Please try again later.";

/// Full settings document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub api_settings: ApiSettings,

    #[serde(default)]
    pub maintenance: MaintenanceSettings,

    /// Unmodelled top-level keys, kept verbatim.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

fn default_name() -> String {
    "Relay API".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            port: default_port(),
            rate_limit: RateLimitSettings::default(),
            cache: CacheSettings::default(),
            api_settings: ApiSettings::default(),
            maintenance: MaintenanceSettings::default(),
            extra: IndexMap::new(),
        }
    }
}

/// Fixed-window rate limit applied per client IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitSettings {
    /// Window length in milliseconds.
    pub window_ms: u64,
    /// Requests allowed per window.
    pub max_requests: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 60,
        }
    }
}

/// Response cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheSettings {
    /// Time to live in milliseconds.
    pub ttl: u64,
    /// Maximum number of cached responses.
    pub max_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: 300_000,
            max_size: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// When false the API key gate admits every request.
    pub require_apikey: bool,
    /// Known keys in insertion order.
    pub apikey: IndexMap<String, ApiKeyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceSettings {
    pub enabled: bool,
    pub message: String,
}

impl MaintenanceSettings {
    /// Message to show clients, falling back to the stock text.
    pub fn display_message(&self) -> &str {
        if self.message.trim().is_empty() {
            DEFAULT_MAINTENANCE_MESSAGE
        } else {
            &self.message
        }
    }
}

impl Settings {
    /// Parses and validates a settings document.
    ///
    /// ```
    /// use relay_core::Settings;
    ///
    /// let settings = Settings::from_json(r#"{"rateLimit": {"windowMs": 1000, "maxRequests": 5}}"#).unwrap();
    /// assert_eq!(settings.rate_limit.max_requests, 5);
    /// assert_eq!(settings.cache.max_size, 500);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.window_ms == 0 {
            return Err(SettingsError::invalid(
                "rateLimit.windowMs",
                "must be greater than zero",
            ));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(SettingsError::invalid(
                "rateLimit.maxRequests",
                "must be greater than zero",
            ));
        }
        if self.cache.ttl == 0 {
            return Err(SettingsError::invalid("cache.ttl", "must be greater than zero"));
        }
        if self.cache.max_size == 0 {
            return Err(SettingsError::invalid(
                "cache.maxSize",
                "must be greater than zero",
            ));
        }
        if let Some(key) = self.api_settings.apikey.keys().find(|k| k.trim().is_empty()) {
            return Err(SettingsError::invalid(
                "apiSettings.apikey",
                format!("key '{}' must not be blank", key),
            ));
        }
        Ok(())
    }

    /// Classifies a presented API key.
    pub fn lookup_key(&self, key: &str) -> KeyLookup<'_> {
        match self.api_settings.apikey.get(key) {
            Some(entry) if entry.enabled => KeyLookup::Valid(entry),
            Some(_) => KeyLookup::Disabled,
            None => KeyLookup::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = Settings::from_json(r#"{"rateLimit": {"windowMs": 0}}"#).unwrap_err();
        assert!(err.is_invalid());
        assert!(err.to_string().contains("rateLimit.windowMs"));
    }

    #[test]
    fn display_message_falls_back() {
        let mut maintenance = MaintenanceSettings::default();
        assert_eq!(maintenance.display_message(), DEFAULT_MAINTENANCE_MESSAGE);

        maintenance.message = "Back at 5pm".to_string();
        assert_eq!(maintenance.display_message(), "Back at 5pm");
    }

    #[test]
    fn lookup_distinguishes_disabled_keys() {
        let settings = Settings::from_json(
            r#"{"apiSettings": {"apikey": {
                "live": {"rateLimit": 10},
                "off": {"enabled": false}
            }}}"#,
        )
        .unwrap();

        assert!(settings.lookup_key("live").is_valid());
        assert_eq!(settings.lookup_key("off"), KeyLookup::Disabled);
        assert_eq!(settings.lookup_key("nope"), KeyLookup::Unknown);
    }
}
