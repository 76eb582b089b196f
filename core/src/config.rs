//! Client configuration and its one-time resolution against the environment.

use std::fmt;
use std::time::Duration;

use crate::error::{NativError, Result};

pub const API_KEY_ENV: &str = "NATIV_API_KEY";
pub const API_URL_ENV: &str = "NATIV_API_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.usenativ.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(120_000);

/// Caller-supplied settings. Anything left unset is resolved from the
/// environment or falls back to a default when the client is built.
#[derive(Clone, Default)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve against the process environment.
    pub fn resolve(self) -> Result<ResolvedConfig> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using `lookup` in place of the process environment.
    pub fn resolve_with<F>(self, lookup: F) -> Result<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let api_key = present(self.api_key)
            .or_else(|| present(lookup(API_KEY_ENV)))
            .ok_or_else(|| {
                NativError::authentication(format!(
                    "no API key provided; pass one explicitly or set {API_KEY_ENV}"
                ))
            })?;

        let base_url = present(self.base_url)
            .or_else(|| present(lookup(API_URL_ENV)))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(ResolvedConfig {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Fully resolved, immutable configuration shared by every call.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub(crate) api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let resolved = ClientConfig::new()
            .api_key("explicit")
            .resolve_with(env(&[(API_KEY_ENV, "from-env")]))
            .unwrap();
        assert_eq!(resolved.api_key, "explicit");
    }

    #[test]
    fn key_falls_back_to_environment() {
        let resolved = ClientConfig::new()
            .resolve_with(env(&[(API_KEY_ENV, "from-env")]))
            .unwrap();
        assert_eq!(resolved.api_key, "from-env");
    }

    #[test]
    fn missing_key_is_an_authentication_failure() {
        let err = ClientConfig::new().resolve_with(env(&[])).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Authentication));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = ClientConfig::new()
            .api_key("  ")
            .resolve_with(env(&[(API_KEY_ENV, "")]))
            .unwrap_err();
        assert!(matches!(err, NativError::Authentication(_)));
    }

    #[test]
    fn base_url_precedence_and_trailing_slashes() {
        let from_env = ClientConfig::new()
            .api_key("k")
            .resolve_with(env(&[(API_URL_ENV, "http://env.local//")]))
            .unwrap();
        assert_eq!(from_env.base_url, "http://env.local");

        let explicit = ClientConfig::new()
            .api_key("k")
            .base_url("http://explicit.local/")
            .resolve_with(env(&[(API_URL_ENV, "http://env.local")]))
            .unwrap();
        assert_eq!(explicit.base_url, "http://explicit.local");

        let default = ClientConfig::new().api_key("k").resolve_with(env(&[])).unwrap();
        assert_eq!(default.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn timeout_defaults_to_two_minutes() {
        let resolved = ClientConfig::new().api_key("k").resolve_with(env(&[])).unwrap();
        assert_eq!(resolved.timeout, Duration::from_secs(120));

        let custom = ClientConfig::new()
            .api_key("k")
            .timeout(Duration::from_millis(250))
            .resolve_with(env(&[]))
            .unwrap();
        assert_eq!(custom.timeout, Duration::from_millis(250));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let resolved = ClientConfig::new().api_key("secret-key").resolve_with(env(&[])).unwrap();
        let rendered = format!("{resolved:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
