/// Edit service configuration parsed from environment variables

use std::time::Duration;

use crate::error::Error;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Variables checked for the API key, in order
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Overall limit for one edit request; `None` waits forever
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Duration,
}

impl ServiceConfig {
    /// Build config from the process environment.
    ///
    /// Required:
    /// - `GEMINI_API_KEY` (or `API_KEY`)
    ///
    /// Optional:
    /// - `STUDIO_MODEL`: default `gemini-2.5-flash-image`
    /// - `STUDIO_API_BASE_URL`: default Generative Language API v1beta
    /// - `STUDIO_REQUEST_TIMEOUT_SECS`: default 120, `0` disables the limit
    /// - `STUDIO_CONNECT_TIMEOUT_SECS`: default 10
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reading values through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| lookup(var))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or_else(|| Error::Config(format!("missing API key: set {}", API_KEY_VARS.join(" or "))))?;

        let model = lookup("STUDIO_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = lookup("STUDIO_API_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let request_secs = parse_secs(&lookup, "STUDIO_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let connect_secs = parse_secs(&lookup, "STUDIO_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;

        Ok(Self {
            api_key,
            model,
            base_url,
            request_timeout: (request_secs > 0).then(|| Duration::from_secs(request_secs)),
            connect_timeout: Duration::from_secs(connect_secs),
        })
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64, Error> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Config(format!("{key} must be a whole number of seconds, got '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_api_key_fallback() {
        let config = ServiceConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  "), ("API_KEY", "legacy")])).unwrap();
        assert_eq!(config.api_key, "legacy");
    }

    #[test]
    fn test_missing_api_key() {
        let err = ServiceConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("STUDIO_MODEL", "custom-image-model"),
            ("STUDIO_API_BASE_URL", "http://localhost:8080/v1/"),
            ("STUDIO_REQUEST_TIMEOUT_SECS", "0"),
            ("STUDIO_CONNECT_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.model, "custom-image-model");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_bad_timeout() {
        let err = ServiceConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("STUDIO_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("STUDIO_REQUEST_TIMEOUT_SECS")));
    }
}
