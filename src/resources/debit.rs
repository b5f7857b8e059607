//! Debits.

use serde_json::{Map, Value, json};

use crate::{
    core::{Collection, Entity, Resource, classify::RequestKind},
    error::Result,
    resources::Refund,
};

/// A charge against a funding instrument.
///
/// Debits are created through the owning instrument —
/// [`Card::debit`](crate::Card::debit) or
/// [`BankAccount::debit`](crate::BankAccount::debit) — not saved
/// directly.
#[derive(Debug, Clone)]
pub struct Debit {
    resource: Resource,
}

impl Entity for Debit {
    const ROOT: &'static str = "/debits";

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

impl Debit {
    /// Charged amount in minor units.
    #[must_use]
    pub fn amount(&self) -> Option<i64> {
        self.resource.get_i64("amount")
    }

    /// Free-form description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.resource.get_str("description")
    }

    /// Processing status, e.g. `"succeeded"`.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.resource.get_str("status")
    }

    /// Caller-attached metadata.
    #[must_use]
    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.resource.get("meta").and_then(Value::as_object)
    }

    /// Refunds the full remaining amount.
    ///
    /// # Errors
    ///
    /// [`ApiError::CannotCreate`](crate::ApiError::CannotCreate) when
    /// the server rejects the refund (already fully refunded, for
    /// instance).
    pub async fn refund(&self) -> Result<Refund> {
        self.refund_with(json!({})).await
    }

    /// Refunds with an explicit payload, e.g. a partial `amount`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`refund`](Self::refund).
    pub async fn refund_with(&self, payload: Value) -> Result<Refund> {
        let resource =
            self.resource.create_child("refunds", payload, RequestKind::Create).await?;
        Ok(Refund::from_resource(resource))
    }

    /// Refunds issued against this debit.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotCreated`](crate::ApiError::NotCreated) on
    /// a debit that was never persisted.
    pub fn refunds(&self) -> Result<Collection<Refund>> {
        self.resource.collection("refunds")
    }
}
