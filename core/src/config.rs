//! Client configuration.
//!
//! The base URL is normalized once at construction: a single trailing slash
//! is stripped and the `/api` root appended unless already present. Every
//! other setting is fixed for the client's lifetime apart from the API key.

use std::fmt;
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Host used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://webfry.dev";

/// Per-request deadline used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Path of the API root under the host.
pub const API_ROOT: &str = "/api";

/// Environment variable names read by `ClientConfig::from_env`.
pub mod vars {
    pub const BASE_URL: &str = "WEBFRY_BASE_URL";
    pub const API_KEY: &str = "WEBFRY_API_KEY";
    pub const TIMEOUT_MS: &str = "WEBFRY_TIMEOUT_MS";
}

/// Normalize `base_url` into the API root URL.
///
/// Idempotent: `normalize_base_url(&normalize_base_url(x)) == normalize_base_url(x)`.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.strip_suffix('/').unwrap_or(base_url);
    if trimmed.ends_with(API_ROOT) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{API_ROOT}")
    }
}

/// Settings for a `WebfryClient`.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    api_key: Option<String>,
    user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            ..Self::default()
        }
    }

    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load settings from `WEBFRY_BASE_URL`, `WEBFRY_API_KEY` and
    /// `WEBFRY_TIMEOUT_MS`, falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = Self::builder();

        if let Some(base_url) = lookup(vars::BASE_URL).filter(|v| !v.is_empty()) {
            builder = builder.base_url(base_url);
        }
        if let Some(api_key) = lookup(vars::API_KEY).filter(|v| !v.is_empty()) {
            builder = builder.api_key(api_key);
        }
        if let Some(raw) = lookup(vars::TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| ApiError::Configuration {
                message: format!("invalid value for {}: {raw:?} is not a number of milliseconds", vars::TIMEOUT_MS),
            })?;
            builder = builder.timeout(Duration::from_millis(millis));
        }

        builder.build()
    }

    /// Normalized API root, e.g. `https://webfry.dev/api`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The stored API key. An empty key counts as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    pub(crate) fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub(crate) fn clear_api_key(&mut self) {
        self.api_key = None;
    }

    /// Absolute URL for an operation path such as `/user_info`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: normalize_base_url(DEFAULT_BASE_URL),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            user_agent: format!("webfry-core/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// The API key never shows up in logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for `ClientConfig`.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    api_key: Option<String>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Host with or without a trailing `/api`.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fails with `ApiError::Configuration` for a zero timeout.
    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();
        let timeout = self.timeout.unwrap_or(defaults.timeout);
        if timeout.is_zero() {
            return Err(ApiError::Configuration {
                message: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(ClientConfig {
            base_url: self
                .base_url
                .as_deref()
                .map_or(defaults.base_url, normalize_base_url),
            timeout,
            api_key: self.api_key,
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn normalization_variants_converge() {
        for input in [
            "https://webfry.dev",
            "https://webfry.dev/",
            "https://webfry.dev/api",
            "https://webfry.dev/api/",
        ] {
            assert_eq!(normalize_base_url(input), "https://webfry.dev/api", "input: {input}");
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        for input in ["http://localhost:8080", "http://localhost:8080/", "https://a.b/c/api/", "x"] {
            let once = normalize_base_url(input);
            assert_eq!(normalize_base_url(&once), once, "input: {input}");
        }
    }

    #[test]
    fn nested_paths_keep_prefix() {
        assert_eq!(normalize_base_url("https://proxy.local/webfry/"), "https://proxy.local/webfry/api");
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "https://webfry.dev/api");
        assert_eq!(config.timeout(), Duration::from_millis(15_000));
        assert!(config.api_key().is_none());
        assert!(config.user_agent().starts_with("webfry-core/"));
    }

    #[test]
    fn url_joins_path() {
        let config = ClientConfig::new("http://localhost:3000/");
        assert_eq!(config.url("/user_info"), "http://localhost:3000/api/user_info");
    }

    #[test]
    fn builder_applies_settings() {
        let config = ClientConfig::builder()
            .base_url("http://127.0.0.1:9000/api/")
            .timeout(Duration::from_millis(250))
            .api_key("abc123")
            .user_agent("tests")
            .build()
            .unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:9000/api");
        assert_eq!(config.timeout(), Duration::from_millis(250));
        assert_eq!(config.api_key(), Some("abc123"));
        assert_eq!(config.user_agent(), "tests");
    }

    #[test]
    fn empty_api_key_counts_as_unset() {
        let config = ClientConfig::builder().api_key("").build().unwrap();
        assert!(config.api_key().is_none());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ClientConfig::builder().timeout(Duration::ZERO).build().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ClientConfig::builder().api_key("super-secret").build().unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_lookup_reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (vars::BASE_URL, "http://localhost:3000"),
            (vars::API_KEY, "from-env"),
            (vars::TIMEOUT_MS, "2500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:3000/api");
        assert_eq!(config.api_key(), Some("from-env"));
        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn env_lookup_falls_back_to_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[(vars::API_KEY, "")])).unwrap();
        assert_eq!(config.base_url(), "https://webfry.dev/api");
        assert!(config.api_key().is_none());
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn env_lookup_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(vars::TIMEOUT_MS, "soon")])).unwrap_err();
        assert!(err.to_string().contains(vars::TIMEOUT_MS));

        let err = ClientConfig::from_lookup(lookup(&[(vars::TIMEOUT_MS, "0")])).unwrap_err();
        assert!(err.is_configuration());
    }
}
