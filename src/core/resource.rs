//! The resource abstraction.
//!
//! A [`Resource`] is the local proxy for one remote entity: an opaque
//! server-assigned address (`href`), a schema-less attribute bag, and
//! the CRUD lifecycle against the API. Concrete entity types (customers,
//! cards, ...) are thin typed views implementing [`Entity`]; the
//! [`EntityOps`] blanket impl gives every one of them `fetch`, `save`,
//! `reload`, and `unstore` without per-type plumbing.
//!
//! Lifecycle invariant: a resource is either *unsaved* (`href` unset) or
//! *persisted* (`href` set, and immutable from then on — the server
//! never changes a resource's address). `save` moves unsaved →
//! persisted; on an already-persisted resource it updates the fields
//! changed locally since the last synchronization. Deleting is terminal:
//! the local object keeps its last-known fields for inspection, and any
//! further server operation surfaces whatever the server answers
//! (typically a 404).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use super::{classify::RequestKind, collection::Collection};
use crate::{
    client::Client,
    error::{ApiError, Result},
};

/// Local proxy for one remote entity.
#[derive(Debug, Clone)]
pub struct Resource {
    client: Client,
    href: Option<String>,
    fields: Map<String, Value>,
    dirty: Vec<String>,
}

impl Resource {
    /// Creates an empty, unsaved resource.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client, href: None, fields: Map::new(), dirty: Vec::new() }
    }

    /// Builds a resource from a deserialized payload.
    pub(crate) fn from_payload(client: Client, payload: Value) -> Result<Self> {
        let mut resource = Self::new(client);
        resource.apply(payload)?;
        Ok(resource)
    }

    /// The client this resource talks through.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Server-assigned address, if the resource is persisted.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Server identifier: the `id` field when present, otherwise the
    /// last path segment of the `href`.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        if let Some(id) = self.fields.get("id").and_then(Value::as_str) {
            return Some(id.to_owned());
        }
        self.href().and_then(|href| href.rsplit('/').next()).map(str::to_owned)
    }

    /// Raw field value.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// String field value.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Integer field value.
    #[must_use]
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(Value::as_i64)
    }

    /// Boolean field value.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.fields.get(field).and_then(Value::as_bool)
    }

    /// RFC 3339 timestamp field value.
    #[must_use]
    pub fn get_datetime(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get_str(field)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// The whole attribute bag.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Sets a field locally and marks it for the next `save`.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        if !self.dirty.contains(&field) {
            self.dirty.push(field.clone());
        }
        self.fields.insert(field, value.into());
    }

    /// View of a nested sub-resource field, such as a bank account's
    /// embedded `verification`.
    #[must_use]
    pub fn nested(&self, field: &str) -> Option<Resource> {
        let value = self.fields.get(field)?;
        value
            .is_object()
            .then(|| Self::from_payload(self.client.clone(), value.clone()).ok())
            .flatten()
    }

    /// Named sub-collection owned by this resource, addressed as
    /// `{href}/{relation}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotCreated`] on an unsaved resource — an
    /// unsaved parent has no address to derive the collection URI from.
    pub fn collection<T: Entity>(&self, relation: &str) -> Result<Collection<T>> {
        let href = self.href().ok_or(ApiError::NotCreated)?;
        Ok(Collection::new(self.client.clone(), format!("{href}/{relation}")))
    }

    /// Persists the resource.
    ///
    /// Unsaved: posts the full attribute bag to `root` and adopts the
    /// returned address and server-computed fields. Persisted: puts the
    /// locally-changed fields to the resource's own address.
    ///
    /// # Errors
    ///
    /// [`ApiError::CannotCreate`] when the server rejects a create
    /// payload; [`ApiError::Http`] for any other non-success response.
    pub async fn save(&mut self, root: &str) -> Result<()> {
        let payload = match self.href.clone() {
            None => {
                let body = Value::Object(self.fields.clone());
                self.client.post(root, &body, RequestKind::Create).await?
            }
            Some(href) => {
                let mut changed = Map::new();
                for field in &self.dirty {
                    if let Some(value) = self.fields.get(field) {
                        changed.insert(field.clone(), value.clone());
                    }
                }
                self.client.put(&href, &Value::Object(changed), RequestKind::Update).await?
            }
        };
        self.apply(payload)?;
        if self.href.is_none() {
            return Err(ApiError::InvalidPayload("create response carried no href".to_owned()));
        }
        debug!(href = self.href.as_deref(), "resource saved");
        Ok(())
    }

    /// Re-fetches the resource and overwrites local fields in place.
    /// The identity (`href`) is unchanged.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotCreated`] on an unsaved resource; [`ApiError::Http`]
    /// for any non-success response, including a 404 after the resource
    /// was deleted.
    pub async fn reload(&mut self) -> Result<()> {
        let href = self.href.clone().ok_or(ApiError::NotCreated)?;
        let payload = self.client.get(&href, &[], RequestKind::Reload).await?;
        self.apply(payload)
    }

    /// Deletes the resource. The local object is terminal afterwards;
    /// its last-known fields remain inspectable.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotCreated`] on an unsaved resource; [`ApiError::Http`]
    /// for any non-success response.
    pub async fn unstore(&mut self) -> Result<()> {
        let href = self.href.clone().ok_or(ApiError::NotCreated)?;
        self.client.delete(&href, RequestKind::Delete).await?;
        debug!(href = href.as_str(), "resource deleted");
        Ok(())
    }

    /// Links this resource to a target by setting the owning relation
    /// field server-side, e.g. a bank account's `customer`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotCreated`] unless both resources are persisted;
    /// [`ApiError::Http`] when the API rejects the link (for instance a
    /// duplicate association).
    pub async fn associate_to(&mut self, relation: &str, target: &Resource) -> Result<()> {
        let href = self.href.clone().ok_or(ApiError::NotCreated)?;
        let target_href = target.href().ok_or(ApiError::NotCreated)?;
        let mut body = Map::new();
        body.insert(relation.to_owned(), Value::String(target_href.to_owned()));
        let payload = self.client.put(&href, &Value::Object(body), RequestKind::Update).await?;
        self.apply(payload)
    }

    /// Creates a resource inside one of this resource's sub-collections.
    pub(crate) async fn create_child(
        &self,
        relation: &str,
        payload: Value,
        kind: RequestKind,
    ) -> Result<Resource> {
        let href = self.href().ok_or(ApiError::NotCreated)?;
        let body = self.client.post(&format!("{href}/{relation}"), &payload, kind).await?;
        Self::from_payload(self.client.clone(), body)
    }

    /// Replaces local fields with a server payload, clearing the dirty
    /// set. Adopts the payload's `href` on first persistence; a
    /// persisted resource's address never changes.
    pub(crate) fn apply(&mut self, payload: Value) -> Result<()> {
        let Value::Object(fields) = payload else {
            return Err(ApiError::InvalidPayload("expected a JSON object payload".to_owned()));
        };
        if let Some(href) = fields.get("href").and_then(Value::as_str) {
            match &self.href {
                Some(existing) if existing != href => {
                    return Err(ApiError::InvalidPayload(format!(
                        "payload href '{href}' does not match resource href '{existing}'"
                    )));
                }
                _ => self.href = Some(href.to_owned()),
            }
        }
        self.fields = fields;
        self.dirty.clear();
        Ok(())
    }
}

/// A typed view over a [`Resource`].
///
/// Implementors are thin adapters: they add typed accessors and
/// domain operations but own no state beyond the wrapped resource.
pub trait Entity: Sized + Send {
    /// Top-level collection the type is created under, e.g. `/customers`.
    const ROOT: &'static str;

    /// Wraps a resource.
    fn from_resource(resource: Resource) -> Self;

    /// The underlying resource.
    fn resource(&self) -> &Resource;

    /// The underlying resource, mutably.
    fn resource_mut(&mut self) -> &mut Resource;
}

/// CRUD lifecycle shared by every entity type.
///
/// Blanket-implemented for all [`Entity`] types; never implement it
/// directly.
#[async_trait]
pub trait EntityOps: Entity {
    /// Fetches and populates an entity from its address.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoResultsFound`] when the address does not resolve;
    /// [`ApiError::Http`] for other non-success responses.
    async fn fetch(client: &Client, href: &str) -> Result<Self> {
        let payload = client.get(href, &[], RequestKind::Lookup).await?;
        Resource::from_payload(client.clone(), payload).map(Self::from_resource)
    }

    /// Persists the entity. See [`Resource::save`].
    ///
    /// # Errors
    ///
    /// Propagates the failure taxonomy of [`Resource::save`].
    async fn save(&mut self) -> Result<()> {
        self.resource_mut().save(Self::ROOT).await
    }

    /// Refreshes the entity from server truth. See [`Resource::reload`].
    ///
    /// # Errors
    ///
    /// Propagates the failure taxonomy of [`Resource::reload`].
    async fn reload(&mut self) -> Result<()> {
        self.resource_mut().reload().await
    }

    /// Deletes the entity. See [`Resource::unstore`].
    ///
    /// # Errors
    ///
    /// Propagates the failure taxonomy of [`Resource::unstore`].
    async fn unstore(&mut self) -> Result<()> {
        self.resource_mut().unstore().await
    }

    /// Server-assigned address, if persisted.
    fn href(&self) -> Option<&str> {
        self.resource().href()
    }

    /// Server identifier, if persisted.
    fn id(&self) -> Option<String> {
        self.resource().id()
    }
}

#[async_trait]
impl<T: Entity> EntityOps for T {}
