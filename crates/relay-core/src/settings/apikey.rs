//! API key entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-key request limit: a number of requests per window, or no limit.
///
/// Serialized as a bare number or the string `"unlimited"`.
///
/// ```
/// use relay_core::KeyRateLimit;
///
/// let limit: KeyRateLimit = "250".parse().unwrap();
/// assert_eq!(limit, KeyRateLimit::Limited(250));
/// assert_eq!("unlimited".parse::<KeyRateLimit>().unwrap(), KeyRateLimit::Unlimited);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawRateLimit", into = "RawRateLimit")]
pub enum KeyRateLimit {
    Limited(u32),
    #[default]
    Unlimited,
}

impl KeyRateLimit {
    /// Returns the maximum requests per window, `None` when unlimited.
    pub fn max_requests(&self) -> Option<u32> {
        match self {
            Self::Limited(max) => Some(*max),
            Self::Unlimited => None,
        }
    }
}

impl fmt::Display for KeyRateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(max) => write!(f, "{}", max),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl FromStr for KeyRateLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unlimited);
        }
        match trimmed.parse::<u32>() {
            Ok(0) => Err("rate limit must be greater than zero".to_string()),
            Ok(max) => Ok(Self::Limited(max)),
            Err(_) => Err(format!(
                "rate limit must be a positive number or 'unlimited', got '{}'",
                trimmed
            )),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRateLimit {
    Number(u32),
    Text(String),
}

impl TryFrom<RawRateLimit> for KeyRateLimit {
    type Error = String;

    fn try_from(raw: RawRateLimit) -> Result<Self, Self::Error> {
        match raw {
            RawRateLimit::Number(0) => Err("rate limit must be greater than zero".to_string()),
            RawRateLimit::Number(max) => Ok(Self::Limited(max)),
            RawRateLimit::Text(text) => text.parse(),
        }
    }
}

impl From<KeyRateLimit> for RawRateLimit {
    fn from(limit: KeyRateLimit) -> Self {
        match limit {
            KeyRateLimit::Limited(max) => RawRateLimit::Number(max),
            KeyRateLimit::Unlimited => RawRateLimit::Text("unlimited".to_string()),
        }
    }
}

/// Metadata stored for each API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyEntry {
    #[serde(default = "default_key_name")]
    pub name: String,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default)]
    pub rate_limit: KeyRateLimit,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_key_name() -> String {
    "Default Key".to_string()
}

fn default_category() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

impl ApiKeyEntry {
    /// New enabled entry stamped with the current time.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        rate_limit: KeyRateLimit,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            rate_limit,
            enabled: true,
            created_at: Some(Utc::now()),
        }
    }
}

/// Outcome of looking up a presented API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLookup<'a> {
    Valid(&'a ApiKeyEntry),
    Disabled,
    Unknown,
}

impl KeyLookup<'_> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}
