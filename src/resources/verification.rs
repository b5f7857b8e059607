//! Bank-account micro-deposit verification.
//!
//! The protocol is a bounded-retry confirmation: the server deposits two
//! small amounts, the caller has [`MAX_ATTEMPTS`] tries to report them
//! back. Attempt accounting is the subtle part — `attempts` counts up
//! from zero, `attempts_remaining` counts down from the maximum, and the
//! two always sum to [`MAX_ATTEMPTS`] until the verification reaches a
//! terminal state.
//!
//! A mismatched confirmation is an expected business outcome, not an
//! error: `confirm` returns `Ok` and records the server's updated state.
//! Illegal transitions — confirming outside the pending state,
//! re-verifying an account — are usage errors and surface as
//! [`ApiError::Verification`].

use serde_json::json;

use crate::{
    core::{Entity, Resource, classify::RequestKind},
    error::{ApiError, Result},
};

/// Attempt budget for confirming micro-deposit amounts.
pub const MAX_ATTEMPTS: i64 = 3;

/// State of a verification, derived from its `verification_status`
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationState {
    /// Deposits sent; awaiting a matching confirmation.
    Pending,
    /// Amounts confirmed; the account can be debited.
    Succeeded,
    /// Attempt budget exhausted. Terminal.
    Failed,
}

impl VerificationState {
    /// Parses a wire status value.
    #[must_use]
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "pending" => Some(Self::Pending),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A micro-deposit verification attached to one bank account.
#[derive(Debug, Clone)]
pub struct BankAccountVerification {
    resource: Resource,
}

impl Entity for BankAccountVerification {
    const ROOT: &'static str = "/verifications";

    fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl BankAccountVerification {
    /// Confirmation attempts made so far.
    #[must_use]
    pub fn attempts(&self) -> Option<i64> {
        self.resource.get_i64("attempts")
    }

    /// Confirmation attempts left before the verification fails
    /// permanently.
    #[must_use]
    pub fn attempts_remaining(&self) -> Option<i64> {
        self.resource.get_i64("attempts_remaining")
    }

    /// Status of the micro-deposits themselves.
    #[must_use]
    pub fn deposit_status(&self) -> Option<&str> {
        self.resource.get_str("deposit_status")
    }

    /// Raw verification status field.
    #[must_use]
    pub fn verification_status(&self) -> Option<&str> {
        self.resource.get_str("verification_status")
    }

    /// Parsed verification state.
    #[must_use]
    pub fn state(&self) -> Option<VerificationState> {
        self.verification_status().and_then(VerificationState::parse)
    }

    /// Reports the two deposited amounts, in minor units.
    ///
    /// On a match the verification succeeds; on a mismatch it stays
    /// pending until the attempt budget runs out, then fails
    /// permanently. Either way the attempt counters advance and this
    /// object reflects the server's updated state on return — inspect
    /// [`state`](Self::state) to see the outcome.
    ///
    /// # Errors
    ///
    /// [`ApiError::Verification`] when the verification is not pending
    /// (already succeeded, already failed, or status unknown);
    /// [`ApiError::NotCreated`] if this object was never persisted.
    pub async fn confirm(&mut self, amount_1: i64, amount_2: i64) -> Result<()> {
        if self.state() != Some(VerificationState::Pending) {
            return Err(ApiError::Verification(
                "confirm requires a pending verification".to_owned(),
            ));
        }
        let href = self.resource.href().ok_or(ApiError::NotCreated)?.to_owned();
        let client = self.resource.client().clone();
        let body = json!({ "amount_1": amount_1, "amount_2": amount_2 });
        let payload = client.put(&href, &body, RequestKind::VerificationConfirm).await?;
        self.resource.apply(payload)
    }
}
