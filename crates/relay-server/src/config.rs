//! Server bootstrap configuration.
//!
//! Read once at startup from an optional `relay.toml` followed by `RELAY_*`
//! environment variables. A plain `PORT` variable, as set by most hosting
//! platforms, overrides the port from both. Runtime behaviour (rate limits,
//! keys, maintenance) lives in the settings file instead; see
//! [`crate::settings_store`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use relay_sources::{ClientConfig, Upstream, UpstreamHosts};
use serde::Deserialize;

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "relay.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Overrides the port from the settings file when set.
    pub port: Option<u16>,
    pub settings_path: PathBuf,
    /// Trust the first `X-Forwarded-For` hop as the client address.
    pub trust_proxy: bool,
    /// Shared secret for `/manage` endpoints. Unset disables them.
    pub admin_key: Option<String>,
    pub settings_reload_secs: u64,
    pub upstream_timeout_secs: u64,
    pub body_limit_bytes: usize,
    /// Base URL overrides, e.g. `tikwm = "https://mirror.example"`.
    pub upstreams: HashMap<Upstream, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: None,
            settings_path: PathBuf::from("config/settings.json"),
            trust_proxy: false,
            admin_key: None,
            settings_reload_secs: 5,
            upstream_timeout_secs: 30,
            body_limit_bytes: 2 * 1024 * 1024,
            upstreams: HashMap::new(),
        }
    }
}

impl ServerConfig {
    /// Loads `relay.toml` (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Some(Path::new(DEFAULT_CONFIG_FILE)))
    }

    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("RELAY").try_parsing(true));

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;

        if let Ok(raw) = std::env::var("PORT")
            && let Ok(port) = raw.trim().parse()
        {
            config.port = Some(port);
        }

        Ok(config)
    }

    /// Parses a TOML document without consulting the environment.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Port to bind: explicit configuration first, then the settings file.
    pub fn effective_port(&self, settings_port: u16) -> u16 {
        self.port.unwrap_or(settings_port)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs.max(1))
    }

    pub fn settings_reload_interval(&self) -> Duration {
        Duration::from_secs(self.settings_reload_secs.max(1))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default().with_timeout(self.upstream_timeout())
    }

    pub fn upstream_hosts(&self) -> UpstreamHosts {
        UpstreamHosts::from(self.upstreams.clone())
    }

    /// The admin secret, ignoring blank values.
    pub fn admin_key(&self) -> Option<&str> {
        self.admin_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_document() {
        let config = ServerConfig::from_toml("").unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, None);
        assert_eq!(config.upstream_timeout(), Duration::from_secs(30));
        assert_eq!(config.effective_port(3000), 3000);
        assert!(config.admin_key().is_none());
    }

    #[test]
    fn explicit_port_wins_over_settings() {
        let config = ServerConfig::from_toml("port = 8080").unwrap();
        assert_eq!(config.effective_port(3000), 8080);
    }

    #[test]
    fn upstream_overrides_parse() {
        let config = ServerConfig::from_toml(
            r#"
            admin_key = "s3cret"
            [upstreams]
            tikwm = "http://127.0.0.1:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.admin_key(), Some("s3cret"));
        assert_eq!(
            config.upstream_hosts().base(Upstream::Tikwm),
            "http://127.0.0.1:9000"
        );
        assert_eq!(
            config.upstream_hosts().base(Upstream::Lrclib),
            Upstream::Lrclib.default_base()
        );
    }

    #[test]
    fn blank_admin_key_is_ignored() {
        let config = ServerConfig::from_toml(r#"admin_key = "  ""#).unwrap();
        assert!(config.admin_key().is_none());
    }
}
