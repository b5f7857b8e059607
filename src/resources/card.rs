//! Payment cards.

use serde_json::Value;

use crate::{
    client::Client,
    core::{Collection, Entity, Resource, classify::RequestKind},
    error::Result,
    resources::{Customer, Debit},
};

/// A tokenized payment card.
#[derive(Debug, Clone)]
pub struct Card {
    resource: Resource,
}

impl Entity for Card {
    const ROOT: &'static str = "/cards";

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

impl Card {
    /// Creates an unsaved card.
    #[must_use]
    pub fn new(client: &Client) -> Self {
        Self { resource: Resource::new(client.clone()) }
    }

    /// Card number (masked by the server after creation).
    #[must_use]
    pub fn number(&self) -> Option<&str> {
        self.resource.get_str("number")
    }

    /// Sets the card number.
    pub fn set_number(&mut self, number: &str) {
        self.resource.set("number", number);
    }

    /// Expiration month, 1-12.
    #[must_use]
    pub fn expiration_month(&self) -> Option<i64> {
        self.resource.get_i64("expiration_month")
    }

    /// Sets the expiration month.
    pub fn set_expiration_month(&mut self, month: i64) {
        self.resource.set("expiration_month", month);
    }

    /// Four-digit expiration year.
    #[must_use]
    pub fn expiration_year(&self) -> Option<i64> {
        self.resource.get_i64("expiration_year")
    }

    /// Sets the expiration year.
    pub fn set_expiration_year(&mut self, year: i64) {
        self.resource.set("expiration_year", year);
    }

    /// Sets the card security code. Never echoed back by the server.
    pub fn set_cvv(&mut self, cvv: &str) {
        self.resource.set("cvv", cvv);
    }

    /// Links this card to a customer.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotCreated`](crate::ApiError::NotCreated) unless both
    /// sides are persisted; [`ApiError::Http`](crate::ApiError::Http)
    /// when the API rejects the link.
    pub async fn associate_to_customer(&mut self, customer: &Customer) -> Result<()> {
        self.resource.associate_to("customer", customer.resource()).await
    }

    /// Charges this card.
    ///
    /// The payload takes the fields the debits endpoint accepts —
    /// `amount` in minor units, optionally `description` and `meta`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotCreated`](crate::ApiError::NotCreated) on an
    /// unsaved card;
    /// [`ApiError::CannotCreate`](crate::ApiError::CannotCreate) when
    /// the server rejects the payload.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use serde_json::json;
    /// # async fn example(card: payrail::Card) -> payrail::Result<()> {
    /// let debit = card
    ///     .debit(json!({ "amount": 10_000, "description": "A simple debit" }))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn debit(&self, payload: Value) -> Result<Debit> {
        let resource =
            self.resource.create_child("debits", payload, RequestKind::Create).await?;
        Ok(Debit::from_resource(resource))
    }

    /// Debits charged against this card.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotCreated`](crate::ApiError::NotCreated) on
    /// an unsaved card.
    pub fn debits(&self) -> Result<Collection<Debit>> {
        self.resource.collection("debits")
    }
}
