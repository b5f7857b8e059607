//! Bank accounts.

use serde_json::{Value, json};

use crate::{
    client::Client,
    core::{Collection, Entity, Resource, classify::RequestKind},
    error::Result,
    resources::{BankAccountVerification, Customer, Debit},
};

/// A bank account funding instrument.
///
/// Debiting a bank account requires proving ownership first: `verify()`
/// starts the micro-deposit protocol and hands back the
/// [`BankAccountVerification`] to confirm against.
#[derive(Debug, Clone)]
pub struct BankAccount {
    resource: Resource,
}

impl Entity for BankAccount {
    const ROOT: &'static str = "/bank_accounts";

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

impl BankAccount {
    /// Creates an unsaved bank account.
    #[must_use]
    pub fn new(client: &Client) -> Self {
        Self { resource: Resource::new(client.clone()) }
    }

    /// Account holder name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.resource.get_str("name")
    }

    /// Sets the account holder name.
    pub fn set_name(&mut self, name: &str) {
        self.resource.set("name", name);
    }

    /// Bank routing number.
    #[must_use]
    pub fn routing_number(&self) -> Option<&str> {
        self.resource.get_str("routing_number")
    }

    /// Sets the routing number.
    pub fn set_routing_number(&mut self, routing_number: &str) {
        self.resource.set("routing_number", routing_number);
    }

    /// Account number (masked by the server after creation).
    #[must_use]
    pub fn account_number(&self) -> Option<&str> {
        self.resource.get_str("account_number")
    }

    /// Sets the account number.
    pub fn set_account_number(&mut self, account_number: &str) {
        self.resource.set("account_number", account_number);
    }

    /// Account type, `"checking"` or `"savings"`.
    #[must_use]
    pub fn account_type(&self) -> Option<&str> {
        self.resource.get_str("account_type")
    }

    /// Sets the account type.
    pub fn set_account_type(&mut self, account_type: &str) {
        self.resource.set("account_type", account_type);
    }

    /// Links this bank account to a customer.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotCreated`](crate::ApiError::NotCreated) unless both
    /// sides are persisted; [`ApiError::Http`](crate::ApiError::Http)
    /// when the API rejects the link.
    pub async fn associate_to_customer(&mut self, customer: &Customer) -> Result<()> {
        self.resource.associate_to("customer", customer.resource()).await
    }

    /// Starts micro-deposit verification.
    ///
    /// The server sends two small deposits and creates a pending
    /// verification; confirm the amounts with
    /// [`BankAccountVerification::confirm`]. The embedded
    /// `verification` field on this account is populated on the next
    /// [`reload`](crate::EntityOps::reload).
    ///
    /// # Errors
    ///
    /// [`ApiError::NotCreated`](crate::ApiError::NotCreated) on an
    /// unsaved account;
    /// [`ApiError::Verification`](crate::ApiError::Verification) when a
    /// verification is already pending or has already succeeded.
    pub async fn verify(&self) -> Result<BankAccountVerification> {
        let resource = self
            .resource
            .create_child("verifications", json!({}), RequestKind::VerificationCreate)
            .await?;
        Ok(BankAccountVerification::from_resource(resource))
    }

    /// The verification attached to this account, as embedded in the
    /// last-fetched payload. `None` before `verify()` or before a
    /// reload makes the embed visible.
    #[must_use]
    pub fn verification(&self) -> Option<BankAccountVerification> {
        self.resource.nested("verification").map(BankAccountVerification::from_resource)
    }

    /// Debits this bank account.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotCreated`](crate::ApiError::NotCreated) on an
    /// unsaved account;
    /// [`ApiError::CannotCreate`](crate::ApiError::CannotCreate) when
    /// the server rejects the payload (for instance, an unverified
    /// account).
    pub async fn debit(&self, payload: Value) -> Result<Debit> {
        let resource =
            self.resource.create_child("debits", payload, RequestKind::Create).await?;
        Ok(Debit::from_resource(resource))
    }

    /// Debits charged against this bank account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotCreated`](crate::ApiError::NotCreated) on
    /// an unsaved account.
    pub fn debits(&self) -> Result<Collection<Debit>> {
        self.resource.collection("debits")
    }
}
