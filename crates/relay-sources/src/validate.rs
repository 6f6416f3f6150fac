//! Input validation shared by integrations.
//!
//! Every check runs before any outbound call.

use reqwest::Url;

use crate::error::{Result, SourceError};

/// Parses an absolute http(s) URL.
pub fn http_url(raw: &str, param: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SourceError::invalid(format!("Parameter '{}' is required", param)));
    }
    let url = Url::parse(trimmed)
        .map_err(|_| SourceError::invalid(format!("Parameter '{}' must be a valid URL", param)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(SourceError::invalid(format!(
            "Parameter '{}' must use http or https, got '{}'",
            param, other
        ))),
    }
}

/// Returns true if `host` is `domain` or one of its subdomains.
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Parses a URL and requires its host to belong to one of `domains`.
///
/// ```
/// use relay_sources::validate::url_for;
///
/// assert!(url_for("https://vm.tiktok.com/ZS123/", &["tiktok.com"], "TikTok").is_ok());
/// assert!(url_for("https://example.com/video", &["tiktok.com"], "TikTok").is_err());
/// ```
pub fn url_for(raw: &str, domains: &[&str], service: &str) -> Result<Url> {
    let url = http_url(raw, "url")?;
    let host = url.host_str().unwrap_or_default();

    if domains.iter().any(|d| host_matches(host, d)) {
        Ok(url)
    } else {
        Err(SourceError::invalid(format!(
            "Parameter 'url' must be a {} URL",
            service
        )))
    }
}

/// Requires a non-blank text parameter.
pub fn non_empty<'a>(value: &'a str, param: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(SourceError::invalid(format!("Parameter '{}' is required", param)))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_url_rejects_other_schemes() {
        assert!(http_url("ftp://files.example.com/a.jpg", "url").is_err());
        assert!(http_url("not a url", "url").is_err());
        assert!(http_url("   ", "url").is_err());
        assert!(http_url("https://i.imgur.com/a.jpg", "url").is_ok());
    }

    #[test]
    fn test_host_matches_subdomains_only() {
        assert!(host_matches("www.instagram.com", "instagram.com"));
        assert!(host_matches("instagram.com", "instagram.com"));
        assert!(!host_matches("notinstagram.com", "instagram.com"));
        assert!(!host_matches("instagram.com.evil.io", "instagram.com"));
    }

    #[test]
    fn test_url_for_message_names_service() {
        let err = url_for("https://example.com", &["x.com", "twitter.com"], "X/Twitter").unwrap_err();
        assert_eq!(err.to_string(), "Parameter 'url' must be a X/Twitter URL");
        assert_eq!(err.code(), 400);
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  lofi  ", "query").unwrap(), "lofi");
        assert!(non_empty("", "query").is_err());
    }
}
