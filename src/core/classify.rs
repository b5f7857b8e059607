//! Response classification.
//!
//! Maps a raw transport response onto the error taxonomy. The mapping is
//! a pure function of the status code, the body, and the semantics of
//! the request that produced it: a 404 means "no such resource" for a
//! direct-address lookup but is an ordinary HTTP failure for a reload,
//! and a 409 on a verification endpoint is a state-machine violation
//! rather than a create rejection.

use serde_json::Value;

use crate::{
    error::{ApiError, Result},
    transport::ApiResponse,
};

/// Semantics of the request being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestKind {
    /// `POST` creating a resource.
    Create,
    /// `GET` of a caller-supplied address.
    Lookup,
    /// `GET` refreshing an already-held resource.
    Reload,
    /// `PUT` updating fields (including association linking).
    Update,
    /// `DELETE`.
    Delete,
    /// `GET` of a collection page.
    List,
    /// `POST` creating a bank-account verification.
    VerificationCreate,
    /// `PUT` confirming micro-deposit amounts.
    VerificationConfirm,
}

/// Classifies a response: the decoded body on success, a typed error
/// otherwise.
pub(crate) fn check(kind: RequestKind, response: &ApiResponse) -> Result<Value> {
    if response.is_success() {
        return response.json();
    }

    let description = description_from(response);
    Err(match (kind, response.status) {
        (RequestKind::Create, 400 | 409 | 422) => ApiError::CannotCreate { description },
        (RequestKind::VerificationCreate, 400 | 409 | 422)
        | (RequestKind::VerificationConfirm, 409) => ApiError::Verification(description),
        (RequestKind::Lookup, 404) => ApiError::NoResultsFound,
        _ => ApiError::Http { status: response.status, body: response.body_text() },
    })
}

/// Server-provided failure description, falling back to the raw body.
fn description_from(response: &ApiResponse) -> String {
    response
        .json()
        .ok()
        .as_ref()
        .and_then(|body| body.get("description"))
        .and_then(Value::as_str)
        .map_or_else(|| response.body_text(), str::to_owned)
}
