//! Base URLs of every third-party service.
//!
//! Each integration talks to exactly one [`Upstream`]. Deployments can point
//! a service at a mirror (and tests at a mock server) through
//! [`UpstreamHosts`] overrides.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Upstream {
    Tikwm,
    Downloaderize,
    Snapins,
    Igram,
    #[serde(rename = "x2twitter")]
    X2Twitter,
    Savetik,
    Pinterest,
    Youtube,
    Ytdown,
    Lrclib,
    Cookpad,
    Sefinek,
    WaifuPics,
    GithubRaw,
    Github,
    Anhmoe,
    Otakotaku,
    Imglarger,
    Ocr,
    Appmaker,
    Nanana,
    Nyckel,
    Zai,
}

impl Upstream {
    pub const ALL: [Upstream; 23] = [
        Upstream::Tikwm,
        Upstream::Downloaderize,
        Upstream::Snapins,
        Upstream::Igram,
        Upstream::X2Twitter,
        Upstream::Savetik,
        Upstream::Pinterest,
        Upstream::Youtube,
        Upstream::Ytdown,
        Upstream::Lrclib,
        Upstream::Cookpad,
        Upstream::Sefinek,
        Upstream::WaifuPics,
        Upstream::GithubRaw,
        Upstream::Github,
        Upstream::Anhmoe,
        Upstream::Otakotaku,
        Upstream::Imglarger,
        Upstream::Ocr,
        Upstream::Appmaker,
        Upstream::Nanana,
        Upstream::Nyckel,
        Upstream::Zai,
    ];

    /// Production base URL, without trailing slash.
    pub fn default_base(&self) -> &'static str {
        match self {
            Self::Tikwm => "https://www.tikwm.com",
            Self::Downloaderize => "https://spotify.downloaderize.com",
            Self::Snapins => "https://snapins.ai",
            Self::Igram => "https://igram.world",
            Self::X2Twitter => "https://x2twitter.com",
            Self::Savetik => "https://savetik.co",
            Self::Pinterest => "https://www.pinterest.com",
            Self::Youtube => "https://www.youtube.com",
            Self::Ytdown => "https://ytdown.io",
            Self::Lrclib => "https://lrclib.net",
            Self::Cookpad => "https://cookpad.com",
            Self::Sefinek => "https://api.sefinek.net",
            Self::WaifuPics => "https://api.waifu.pics",
            Self::GithubRaw => "https://raw.githubusercontent.com",
            Self::Github => "https://github.com",
            Self::Anhmoe => "https://anh.moe",
            Self::Otakotaku => "https://otakotaku.com",
            Self::Imglarger => "https://get1.imglarger.com",
            Self::Ocr => "https://staging-ai-image-ocr-266i.frontend.encr.app",
            Self::Appmaker => "https://standalone-app-api.appmaker.xyz",
            Self::Nanana => "https://nanana.app",
            Self::Nyckel => "https://www.nyckel.com",
            Self::Zai => "https://chat.z.ai",
        }
    }

    /// Key used in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Tikwm => "tikwm",
            Self::Downloaderize => "downloaderize",
            Self::Snapins => "snapins",
            Self::Igram => "igram",
            Self::X2Twitter => "x2twitter",
            Self::Savetik => "savetik",
            Self::Pinterest => "pinterest",
            Self::Youtube => "youtube",
            Self::Ytdown => "ytdown",
            Self::Lrclib => "lrclib",
            Self::Cookpad => "cookpad",
            Self::Sefinek => "sefinek",
            Self::WaifuPics => "waifu-pics",
            Self::GithubRaw => "github-raw",
            Self::Github => "github",
            Self::Anhmoe => "anhmoe",
            Self::Otakotaku => "otakotaku",
            Self::Imglarger => "imglarger",
            Self::Ocr => "ocr",
            Self::Appmaker => "appmaker",
            Self::Nanana => "nanana",
            Self::Nyckel => "nyckel",
            Self::Zai => "zai",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolves the base URL for each upstream, honouring overrides.
#[derive(Debug, Clone, Default)]
pub struct UpstreamHosts {
    overrides: HashMap<Upstream, String>,
}

impl UpstreamHosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style override.
    pub fn with(mut self, upstream: Upstream, base: impl Into<String>) -> Self {
        self.set(upstream, base);
        self
    }

    pub fn set(&mut self, upstream: Upstream, base: impl Into<String>) {
        let base = base.into().trim_end_matches('/').to_string();
        self.overrides.insert(upstream, base);
    }

    /// Points every upstream at the same base (mock servers).
    pub fn all_at(base: impl Into<String>) -> Self {
        let base = base.into();
        let mut hosts = Self::new();
        for upstream in Upstream::ALL {
            hosts.set(upstream, base.clone());
        }
        hosts
    }

    pub fn base(&self, upstream: Upstream) -> String {
        self.overrides
            .get(&upstream)
            .cloned()
            .unwrap_or_else(|| upstream.default_base().to_string())
    }

    /// Number of overridden upstreams.
    pub fn overridden(&self) -> usize {
        self.overrides.len()
    }
}

impl From<HashMap<Upstream, String>> for UpstreamHosts {
    fn from(map: HashMap<Upstream, String>) -> Self {
        let mut hosts = Self::new();
        for (upstream, base) in map {
            hosts.set(upstream, base);
        }
        hosts
    }
}
