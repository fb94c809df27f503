//! Client configuration parsed from environment variables.

use std::time::Duration;

use crate::error::TriageError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const ANALYZE_PATH: &str = "/api/email/analyze";
pub const HEALTH_PATH: &str = "/health";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables.
    ///
    /// - `TRIAGE_API_URL`: service base URL, default `http://localhost:8000`
    /// - `TRIAGE_REQUEST_TIMEOUT_SECS`: default 60
    /// - `TRIAGE_CONNECT_TIMEOUT_SECS`: default 10
    pub fn from_env() -> Result<Self, TriageError> {
        let base_url =
            std::env::var("TRIAGE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::default()
            .with_base_url(&base_url)
            .map(|config| ClientConfig {
                request_timeout_secs: env_parse_u64(
                    "TRIAGE_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                ),
                connect_timeout_secs: env_parse_u64(
                    "TRIAGE_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONNECT_TIMEOUT_SECS,
                ),
                ..config
            })
    }

    /// Replace the base URL. Trailing slashes are dropped so paths join cleanly.
    pub fn with_base_url(self, base_url: &str) -> Result<Self, TriageError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(TriageError::Config(format!(
                "base URL must start with http:// or https://, got {base_url:?}"
            )));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            ..self
        })
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.base_url, ANALYZE_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9000/")
            .unwrap();
        assert_eq!(
            config.analyze_url(),
            "http://127.0.0.1:9000/api/email/analyze"
        );
        assert_eq!(config.health_url(), "http://127.0.0.1:9000/health");
    }

    #[test]
    fn non_http_url_is_rejected() {
        let err = ClientConfig::default().with_base_url("ftp://example.com");
        assert!(matches!(err, Err(TriageError::Config(_))));
    }
}
