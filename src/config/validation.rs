//! Configuration validation logic.

use regex::Regex;
use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Schemes a proxy entry may be keyed by.
const PROXY_SCHEMES: &[&str] = &["http", "https", "all"];

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_url("network.base_url", &config.network.base_url)?;
    validate_url("network.upload_base_url", &config.network.upload_base_url)?;
    validate_timeout("network.timeout_seconds", config.network.timeout_seconds)?;
    validate_timeout(
        "network.upload_timeout_seconds",
        config.network.upload_timeout_seconds,
    )?;
    validate_proxies(config.network.proxy.iter())?;
    validate_resolution(&config.download.resolution)?;

    if config.network.user_agent.trim().is_empty() {
        return Err(Error::ConfigValidation {
            field: "network.user_agent".to_string(),
            message: "User agent must not be empty".to_string(),
        });
    }

    Ok(())
}

/// Require an absolute http(s) URL.
pub fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| Error::ConfigValidation {
        field: field.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: format!("'{}' must use http or https", value),
        });
    }

    Ok(())
}

pub fn validate_timeout(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        return Err(Error::ConfigValidation {
            field: field.to_string(),
            message: "Timeout must be at least one second".to_string(),
        });
    }
    Ok(())
}

/// Check every `{scheme → URL}` proxy entry.
pub fn validate_proxies<'a, I>(entries: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    for (scheme, url) in entries {
        if !PROXY_SCHEMES.contains(&scheme.as_str()) {
            return Err(Error::ConfigValidation {
                field: "network.proxy".to_string(),
                message: format!(
                    "Unknown proxy scheme '{}' (expected one of: {})",
                    scheme,
                    PROXY_SCHEMES.join(", ")
                ),
            });
        }

        let parsed = Url::parse(url).map_err(|e| Error::ConfigValidation {
            field: "network.proxy".to_string(),
            message: format!("Proxy '{}' is not a valid URL: {}", url, e),
        })?;

        if !matches!(parsed.scheme(), "http" | "https" | "socks5" | "socks5h") {
            return Err(Error::ConfigValidation {
                field: "network.proxy".to_string(),
                message: format!("Proxy '{}' uses an unsupported scheme", url),
            });
        }
    }

    Ok(())
}

/// Resolution tiers look like `480p` or `1080p`.
pub fn validate_resolution(resolution: &str) -> Result<()> {
    let pattern = Regex::new(r"^\d{3,4}p$").map_err(|e| Error::Config(e.to_string()))?;

    if !pattern.is_match(resolution) {
        return Err(Error::ConfigValidation {
            field: "download.resolution".to_string(),
            message: format!(
                "Invalid resolution '{}'. Expected a tier such as 480p or 1080p.",
                resolution
            ),
        });
    }

    Ok(())
}

/// Extract the video uid from a watch URL or accept a bare uid.
pub fn parse_video_uid(input: &str) -> Result<String> {
    let input = input.trim();

    let candidate = if input.starts_with("http://") || input.starts_with("https://") {
        let url = Url::parse(input)?;
        url.path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
            .unwrap_or_default()
    } else {
        input.trim_matches('/').to_string()
    };

    let pattern = Regex::new(r"^[A-Za-z0-9]+$").map_err(|e| Error::Config(e.to_string()))?;
    if pattern.is_match(&candidate) {
        return Ok(candidate);
    }

    Err(Error::InvalidArgument(format!(
        "Could not extract a video id from '{}'",
        input
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_invalid_urls() {
        assert!(validate_url("f", "not a url").is_err());
        assert!(validate_url("f", "ftp://example.com").is_err());
        assert!(validate_url("f", "https://www.aparat.com").is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.network.timeout_seconds = 0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { field, .. }) if field == "network.timeout_seconds"
        ));
    }

    #[test]
    fn test_proxy_schemes() {
        let mut proxies = HashMap::new();
        proxies.insert("https".to_string(), "http://127.0.0.1:8080".to_string());
        assert!(validate_proxies(proxies.iter()).is_ok());

        proxies.insert("gopher".to_string(), "http://127.0.0.1:8080".to_string());
        assert!(validate_proxies(proxies.iter()).is_err());
    }

    #[test]
    fn test_resolution_format() {
        assert!(validate_resolution("480p").is_ok());
        assert!(validate_resolution("1080p").is_ok());
        assert!(validate_resolution("48p").is_err());
        assert!(validate_resolution("hd").is_err());
        assert!(validate_resolution("720").is_err());
    }

    #[test]
    fn test_parse_video_uid() {
        assert_eq!(parse_video_uid("abc12").unwrap(), "abc12");
        assert_eq!(parse_video_uid("https://www.aparat.com/v/abc12").unwrap(), "abc12");
        assert_eq!(parse_video_uid("https://www.aparat.com/v/abc12/").unwrap(), "abc12");
        assert!(parse_video_uid("https://www.aparat.com/").is_err());
        assert!(parse_video_uid("a b").is_err());
    }
}
