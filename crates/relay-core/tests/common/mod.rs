#![allow(dead_code)]
use relay_core::Settings;

/// Parses a settings fixture. Panics on invalid JSON (intended for tests).
pub fn settings_from_json(json: &str) -> Settings {
    Settings::from_json(json).expect("Failed to parse test settings")
}

/// A settings document resembling a production deployment.
pub fn production_settings_json() -> &'static str {
    r#"{
        "name": "Relay API",
        "version": "2.3.1",
        "port": 8080,
        "description": "Public scraping gateway",
        "rateLimit": { "windowMs": 60000, "maxRequests": 30 },
        "cache": { "ttl": 120000, "maxSize": 200 },
        "apiSettings": {
            "requireApikey": true,
            "apikey": {
                "free-key": { "name": "Free", "category": "free", "rateLimit": 20, "enabled": true },
                "vip-key": { "name": "VIP", "category": "premium", "rateLimit": "unlimited", "enabled": true },
                "banned": { "name": "Old", "category": "free", "rateLimit": 5, "enabled": false }
            }
        },
        "maintenance": { "enabled": false, "message": "" },
        "categories": [ { "name": "Downloader", "items": [] } ]
    }"#
}
