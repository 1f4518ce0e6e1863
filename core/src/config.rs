//! Client configuration.
//!
//! Defaults point at the public API: `https://api.hetzner.cloud/v1`, a 30
//! second timeout and an `hcloud-rust/<version>` user agent. Operation
//! templates are relative to the base URL, so a custom endpoint must include
//! its own version prefix.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.hetzner.cloud/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("hcloud-rust/", env!("CARGO_PKG_VERSION"));

pub const TOKEN_ENV: &str = "HCLOUD_TOKEN";
pub const ENDPOINT_ENV: &str = "HCLOUD_ENDPOINT";
pub const TIMEOUT_ENV: &str = "HCLOUD_TIMEOUT";

#[derive(Clone)]
pub struct Config {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
    pub user_agent: String,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

// The token stays out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("headers", &self.headers)
            .finish()
    }
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: Vec::new(),
        }
    }

    /// Read `HCLOUD_TOKEN` (required), `HCLOUD_ENDPOINT` and `HCLOUD_TIMEOUT`
    /// (whole seconds) from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(TOKEN_ENV).ok_or_else(|| Error::Config(format!("{TOKEN_ENV} is not set")))?;
        let mut config = Config::new(token);
        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            config = config.with_base_url(endpoint);
        }
        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            let secs: u64 = timeout
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{TIMEOUT_ENV} must be whole seconds, got {timeout:?}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Check that the token is set and the base URL is an absolute http(s)
    /// URL.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::Config("API token must not be empty".to_string()));
        }
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base URL must use http or https, got {:?}",
                url.scheme()
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(Error::Config(
                "base URL must not carry a query or fragment".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::new("secret");
        assert_eq!(config.base_url, "https://api.hetzner.cloud/v1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("hcloud-rust/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_redacts_token() {
        let rendered = format!("{:?}", Config::new("very-secret-token"));
        assert!(!rendered.contains("very-secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = Config::new("  ").validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn bad_base_urls_are_rejected() {
        for base in ["not a url", "ftp://api.example.com", "https://api.example.com/v1?x=1"] {
            let err = Config::new("t").with_base_url(base).validate().unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{base}");
        }
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = Config::new("t").with_base_url("http://localhost:3000/v1/");
        assert_eq!(config.base_url, "http://localhost:3000/v1");
    }

    #[test]
    fn env_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("HCLOUD_TOKEN", "abc"),
            ("HCLOUD_ENDPOINT", "http://127.0.0.1:8080/v1"),
            ("HCLOUD_TIMEOUT", "5"),
        ]))
        .unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn env_lookup_requires_token() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("HCLOUD_TOKEN")));
    }

    #[test]
    fn env_lookup_rejects_bad_timeout() {
        let err = Config::from_lookup(lookup(&[("HCLOUD_TOKEN", "abc"), ("HCLOUD_TIMEOUT", "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
