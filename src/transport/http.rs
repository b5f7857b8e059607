//! HTTP transport over reqwest.
//!
//! Authenticates every request with the configured API key (HTTP basic
//! auth, key as username), tags it with a generated request id, and
//! returns whatever status and body the API produced. Retry is opt-in
//! via [`RetryPolicy`] and never touches 4xx responses.

use std::{sync::LazyLock, time::Duration};

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use super::{ApiRequest, ApiResponse, Method, RetryPolicy, Transport, retry};
use crate::{
    config::{ApiConfig, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS},
    error::{ApiError, Result},
};

/// Shared HTTP client for transports running with default timeouts.
///
/// A singleton preserves connection pooling across transport instances.
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(10)
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .expect("default HTTP client construction cannot fail")
});

/// Production transport over HTTP/1.1 and HTTP/2.
///
/// # Examples
///
/// ```no_run
/// use payrail::{ApiConfig, transport::HttpTransport};
///
/// let transport = HttpTransport::new(ApiConfig::new("sk_test_key"))?;
/// # Ok::<(), payrail::ApiError>(())
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    config: ApiConfig,
    retry: RetryPolicy,
}

impl HttpTransport {
    /// Creates a transport for the given configuration.
    ///
    /// Configurations using the default timeouts share one pooled
    /// client; custom timeouts get a dedicated client. Retry starts
    /// disabled — see [`Self::with_retry`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`] if the configuration fails
    /// validation, or [`ApiError::Transport`] if client construction
    /// fails.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;
        let client = if config.timeout_secs == DEFAULT_TIMEOUT_SECS
            && config.connect_timeout_secs == DEFAULT_CONNECT_TIMEOUT_SECS
        {
            DEFAULT_HTTP_CLIENT.clone()
        } else {
            Client::builder()
                .pool_max_idle_per_host(10)
                .timeout(Duration::from_secs(config.timeout_secs))
                .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
                .build()?
        };
        Ok(Self { client, config, retry: RetryPolicy::disabled() })
    }

    /// Enables retry with the given policy.
    ///
    /// Retried failures are 5xx responses and connection-level errors
    /// only; the resource layer above never observes intermediate
    /// attempts.
    #[must_use]
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Resolves a request path against the base URL and appends the
    /// extra query pairs.
    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{path}", self.config.base_url()))
            .map_err(|e| ApiError::InvalidConfig(format!("invalid request url '{path}': {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (k, v)));
        }
        Ok(url)
    }

    async fn send_once(&self, request: &ApiRequest<'_>) -> Result<ApiResponse> {
        let url = self.build_url(request.path, request.query)?;

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };

        let mut builder = builder
            .basic_auth(&self.config.api_key, None::<&str>)
            .header("X-Request-Id", Uuid::new_v4().to_string())
            .header("Accept", "application/json");
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(ApiResponse { status, body })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = request.path))]
    async fn execute(&self, request: ApiRequest<'_>) -> Result<ApiResponse> {
        let mut attempt = 0u32;
        loop {
            let result = self.send_once(&request).await;

            let transient = match &result {
                Ok(response) => response.status >= 500,
                Err(error) => retry::is_retryable(error),
            };
            if !transient || attempt + 1 >= self.retry.max_attempts {
                if let Ok(response) = &result {
                    debug!(status = response.status, "request completed");
                }
                return result;
            }

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(
                attempt = attempt + 1,
                max_attempts = self.retry.max_attempts,
                delay_ms = delay.as_millis() as u64,
                "transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
