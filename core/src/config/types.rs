//! Resolved client configuration for toolzz core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Base URL of the backend's local runner
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable that overrides the backend base URL
pub const BASE_URL_ENV: &str = "TOOLZZ_API_BASE_URL";

/// A fully resolved client configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedClientConfig {
    /// Base URL of the backend, without trailing slash
    pub base_url: String,
    /// Client-supplied OpenAI key forwarded as `api_key` on scrape requests
    #[serde(default)]
    pub api_key: Option<String>,
    /// Optional request timeout. None leaves timing to the network stack.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Additional headers for requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ResolvedClientConfig {
    /// Create a new resolved config for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            timeout_secs: None,
            headers: HashMap::new(),
        }
    }

    /// Set the client-side API key. Blank keys are treated as absent.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self
    }

    /// Set a request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Add multiple headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Join an API path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, value: String| ConfigError::InvalidValue {
            field: field.to_string(),
            value,
        };

        if self.base_url.is_empty() {
            return Err(invalid("base_url", "cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(invalid(
                "base_url",
                format!("{} (must start with http:// or https://)", self.base_url),
            ));
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(invalid("base_url", format!("{} is not a valid URL", self.base_url)));
        }

        if self.timeout_secs == Some(0) {
            return Err(invalid("timeout_secs", "must be greater than zero".to_string()));
        }

        Ok(())
    }
}

impl Default for ResolvedClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ResolvedClientConfig::new("http://localhost:8000/");
        assert_eq!(config.endpoint("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_blank_api_key_is_absent() {
        let config = ResolvedClientConfig::default().with_api_key(Some("   ".to_string()));
        assert!(config.api_key.is_none());

        let config = ResolvedClientConfig::default().with_api_key(Some(" sk-1 ".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-1"));
    }

    #[test]
    fn test_validate() {
        assert!(ResolvedClientConfig::default().validate().is_ok());
        assert!(matches!(
            ResolvedClientConfig::new("ftp://host").validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "base_url"
        ));
        assert!(ResolvedClientConfig::new("")
            .validate()
            .is_err());
        assert!(ResolvedClientConfig::default()
            .with_timeout_secs(Some(0))
            .validate()
            .is_err());
    }
}
