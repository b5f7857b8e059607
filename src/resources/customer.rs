//! Customers.

use crate::{
    client::Client,
    core::{Collection, Entity, Resource},
    error::Result,
    resources::{BankAccount, Card, Debit},
};

/// A person or business on the marketplace.
#[derive(Debug, Clone)]
pub struct Customer {
    resource: Resource,
}

impl Entity for Customer {
    const ROOT: &'static str = "/customers";

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

impl Customer {
    /// Creates an unsaved customer.
    #[must_use]
    pub fn new(client: &Client) -> Self {
        Self { resource: Resource::new(client.clone()) }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.resource.get_str("name")
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: &str) {
        self.resource.set("name", name);
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.resource.get_str("email")
    }

    /// Sets the email address.
    pub fn set_email(&mut self, email: &str) {
        self.resource.set("email", email);
    }

    /// Bank accounts associated to this customer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotCreated`](crate::ApiError::NotCreated) on
    /// an unsaved customer.
    pub fn bank_accounts(&self) -> Result<Collection<BankAccount>> {
        self.resource.collection("bank_accounts")
    }

    /// Cards associated to this customer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotCreated`](crate::ApiError::NotCreated) on
    /// an unsaved customer.
    pub fn cards(&self) -> Result<Collection<Card>> {
        self.resource.collection("cards")
    }

    /// Debits charged against this customer's funding instruments.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotCreated`](crate::ApiError::NotCreated) on
    /// an unsaved customer.
    pub fn debits(&self) -> Result<Collection<Debit>> {
        self.resource.collection("debits")
    }
}
