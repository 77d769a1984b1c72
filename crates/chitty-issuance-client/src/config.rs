//! Issuance client configuration.
//!
//! Points at the production issuance service by default. Override via
//! environment variables or explicit construction for staging/testing.

use url::Url;
use zeroize::Zeroizing;

/// Default issuance service base URL.
pub const DEFAULT_SERVICE_URL: &str = "https://id.chitty.cc";

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for connecting to the ChittyID issuance service.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct IssuanceConfig {
    /// Base URL of the issuance service. Always ends with `/`.
    pub base_url: Url,
    /// Bearer token for the mint endpoint.
    pub api_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for IssuanceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuanceConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl IssuanceConfig {
    /// Build a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` does not parse,
    /// `ConfigError::MissingToken` if the token is empty, or
    /// `ConfigError::InvalidToken` if it cannot be sent in a header.
    pub fn new(base_url: &str, api_token: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        check_token(api_token)?;
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            api_token: Zeroizing::new(api_token.to_string()),
            timeout_secs,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CHITTY_ID_TOKEN` (required)
    /// - `CHITTY_ID_SERVICE_URL` (default: `https://id.chitty.cc`)
    /// - `CHITTY_ID_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = std::env::var("CHITTY_ID_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;
        check_token(&api_token)?;

        let raw_url =
            std::env::var("CHITTY_ID_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.into());

        Ok(Self {
            base_url: parse_base_url("CHITTY_ID_SERVICE_URL", &raw_url)?,
            api_token: Zeroizing::new(api_token),
            timeout_secs: std::env::var("CHITTY_ID_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Reject tokens that are blank or would not form a valid
/// `Authorization: Bearer` header value.
fn check_token(token: &str) -> Result<(), ConfigError> {
    if token.trim().is_empty() {
        return Err(ConfigError::MissingToken);
    }
    let bearer = Zeroizing::new(format!("Bearer {token}"));
    reqwest::header::HeaderValue::from_str(&bearer)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidToken)
}

/// Parse a base URL, appending a trailing slash so relative paths join
/// beneath it rather than replacing its last segment.
fn parse_base_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CHITTY_ID_TOKEN environment variable is required; identifiers cannot be obtained without it")]
    MissingToken,
    #[error("CHITTY_ID_TOKEN contains characters that cannot be sent in an Authorization header")]
    InvalidToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
