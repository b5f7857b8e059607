//! Error types for the Payrail client.
//!
//! All fallible operations in this crate return [`Result`], whose error
//! type is the [`ApiError`] taxonomy. The taxonomy distinguishes the
//! failures a caller can act on differently:
//!
//! - **Transport failures** ([`ApiError::Transport`]): the request never
//!   produced an API response (DNS, TLS, timeout, connection refused).
//! - **API rejections** ([`ApiError::Http`]): the API answered with a
//!   non-success status that carries no more specific meaning.
//! - **Create rejections** ([`ApiError::CannotCreate`]): the server
//!   refused a create payload — fix the input and retry, as opposed to a
//!   transient failure.
//! - **Usage errors** ([`ApiError::NotCreated`], [`ApiError::Verification`]):
//!   the caller violated a lifecycle or state-machine precondition.
//! - **Lookup outcomes** ([`ApiError::NoResultsFound`],
//!   [`ApiError::MultipleResultsFound`]): a unique lookup did not resolve
//!   to exactly one resource.
//!
//! Errors are raised at the point of detection and propagate to the
//! caller; the client never retries silently and never substitutes
//! default values.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur while talking to the Payrail API.
///
/// Variants carry enough context to diagnose the failure without
/// re-issuing the request; the raw response body is preserved on
/// [`Http`](Self::Http) for that reason.
#[must_use = "errors should be handled or propagated"]
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API returned a non-success status with no more specific
    /// classification.
    ///
    /// 5xx responses are worth retrying from the caller's side; 4xx
    /// responses are not — see [`crate::transport::is_retryable`].
    #[error("api returned status {status}: {body}")]
    Http {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// The request failed before an API response was produced.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, connection failures, DNS
    /// resolution errors, TLS errors.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected a create payload.
    ///
    /// Distinct from [`Http`](Self::Http) so callers can branch on
    /// "fix the input" versus "transient failure". The description is
    /// taken from the response body when the server provides one.
    #[error("create rejected: {description}")]
    CannotCreate {
        /// Server-provided rejection reason.
        description: String,
    },

    /// An operation required a persisted resource but the local object
    /// has never been saved (its `href` is unset).
    #[error("operation requires a persisted resource")]
    NotCreated,

    /// A unique lookup, or a direct fetch by address, matched zero
    /// resources.
    #[error("no results found")]
    NoResultsFound,

    /// A unique lookup matched more than one resource. The caller's
    /// filter was underspecified.
    #[error("multiple results found for a unique lookup")]
    MultipleResultsFound,

    /// An illegal bank-account verification transition was attempted,
    /// such as re-verifying an account whose verification is already
    /// pending or succeeded, or confirming outside the pending state.
    #[error("verification failure: {0}")]
    Verification(String),

    /// Client configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A response body could not be decoded as the expected shape.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl ApiError {
    /// HTTP status of the failed response, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
