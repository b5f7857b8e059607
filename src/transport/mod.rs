//! Transport abstraction.
//!
//! Every API operation in this crate funnels through the [`Transport`]
//! trait: one authenticated request in, one raw status-plus-body response
//! out. The production implementation is [`HttpTransport`] over reqwest;
//! tests install an in-memory fake. Timeouts and retry live here — the
//! resource and query layers above never retry and never inspect
//! transport configuration.
//!
//! A non-2xx status is **not** a transport error: the transport reports
//! whatever the API answered, and the caller's error classifier decides
//! what the status means for the operation that issued it. Only failures
//! that prevent a response at all (DNS, TLS, timeout) surface as
//! [`ApiError::Transport`](crate::error::ApiError::Transport).

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ApiError, Result};

pub mod http;
pub mod retry;

pub use http::HttpTransport;
pub use retry::{RetryPolicy, is_retryable};

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Fetch a resource or collection page.
    Get,
    /// Create a resource.
    Post,
    /// Update a resource's fields.
    Put,
    /// Delete a resource.
    Delete,
}

impl Method {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API request.
///
/// `path` is relative to the configured base URL and may already carry a
/// query string (pagination `next` links are passed through verbatim);
/// additional pairs in `query` are appended on top.
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, e.g. `/customers/CU1/debits`.
    pub path: &'a str,
    /// Extra query parameters to append, in order.
    pub query: &'a [(String, String)],
    /// JSON request body, if any.
    pub body: Option<&'a Value>,
}

/// Raw response from a transport.
#[derive(Debug)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes. Empty for bodyless responses.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// True for any 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON. An empty body decodes to `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidPayload`] if the body is non-empty and
    /// not valid JSON.
    pub fn json(&self) -> Result<Value> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::InvalidPayload(format!("response is not valid JSON: {e}")))
    }

    /// Body as lossily-decoded text, for diagnostics.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Issues authenticated API requests.
///
/// Implementations must be safe to share across tasks; the client holds
/// a single transport behind an `Arc` for its whole lifetime.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Executes one request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`](crate::error::ApiError::Transport)
    /// when no response could be obtained. Non-2xx statuses are returned
    /// as ordinary [`ApiResponse`] values.
    async fn execute(&self, request: ApiRequest<'_>) -> Result<ApiResponse>;
}
