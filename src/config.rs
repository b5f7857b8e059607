//! Client configuration.
//!
//! The API key and base URL are carried by an explicit [`ApiConfig`]
//! value that the transport captures at construction. There is no
//! process-global credential state; two clients with different keys can
//! coexist in one process, and tests can build a config without touching
//! the environment.

use std::fmt;

use serde::Deserialize;
use url::Url;

use crate::error::{ApiError, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.payrail.dev/v1";

/// Default total request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "PAYRAIL_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_VAR: &str = "PAYRAIL_API_URL";

/// Configuration for a Payrail API client.
///
/// Deserializable from TOML for file-based configuration, or built from
/// the environment with [`ApiConfig::from_env`].
///
/// # Examples
///
/// ```
/// use payrail::ApiConfig;
///
/// let config: ApiConfig = toml::from_str(
///     r#"
///         api_key = "sk_test_abc"
///         base_url = "https://api.staging.payrail.dev/v1"
///     "#,
/// )
/// .unwrap();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    /// Secret API key, sent as the basic-auth username on every request.
    pub api_key: String,

    /// API base URL (default: [`DEFAULT_BASE_URL`]).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl ApiConfig {
    /// Creates a configuration with the given API key and defaults for
    /// everything else.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Builds a configuration from the environment.
    ///
    /// Reads the key from `PAYRAIL_API_KEY` (required) and the base URL
    /// from `PAYRAIL_API_URL` (optional).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if the key variable is unset
    /// or empty.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| ApiError::InvalidConfig(format!("{API_KEY_VAR} is not set")))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration from a TOML document and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] on a parse or validation
    /// failure.
    pub fn from_toml(document: &str) -> Result<Self> {
        let config: Self = toml::from_str(document)
            .map_err(|e| ApiError::InvalidConfig(format!("config parse failed: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// The API key must be non-empty and the base URL must parse as an
    /// HTTPS URL without a trailing slash worth of ambiguity (trailing
    /// slashes are tolerated and normalized by [`Self::base_url`]).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ApiError::InvalidConfig("api_key must not be empty".to_owned()));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            ApiError::InvalidConfig(format!("invalid base_url '{}': {e}", self.base_url))
        })?;

        if url.scheme() != "https" {
            return Err(ApiError::InvalidConfig(format!(
                "base_url must use HTTPS, got: {}",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ApiError::InvalidConfig("timeout_secs must be positive".to_owned()));
        }

        Ok(())
    }

    /// Base URL with any trailing slash stripped, ready for path
    /// concatenation.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

// Manual Debug so the API key never lands in logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}
