//! Owned sub-resource collections.
//!
//! A [`Collection`] is a named set of resources owned by one parent,
//! addressed as `{parent.href}/{relation}` — a card's debits, a debit's
//! refunds. It is never fetched eagerly: it exists to hand out
//! [`ResourceQuery`] values and to run the default-order shorthands.

use std::{fmt, marker::PhantomData};

use serde_json::Value;

use super::{
    classify::RequestKind,
    query::ResourceQuery,
    resource::{Entity, Resource},
};
use crate::{client::Client, error::Result};

/// Named, owned set of sub-resources reachable from a parent resource.
pub struct Collection<T: Entity> {
    client: Client,
    uri: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Collection<T> {
    pub(crate) fn new(client: Client, uri: String) -> Self {
        Self { client, uri, _marker: PhantomData }
    }

    /// The collection's URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// A fresh, empty query scoped to this collection.
    #[must_use]
    pub fn query(&self) -> ResourceQuery<T> {
        ResourceQuery::new(self.client.clone(), self.uri.clone())
    }

    /// Every member in the server's default order. Equivalent to
    /// `query().all()`.
    ///
    /// # Errors
    ///
    /// Propagates transport and API failures as
    /// [`ApiError`](crate::ApiError).
    pub async fn all(&self) -> Result<Vec<T>> {
        self.query().all().await
    }

    /// Number of members. Equivalent to `query().total()`.
    ///
    /// # Errors
    ///
    /// Propagates transport and API failures as
    /// [`ApiError`](crate::ApiError).
    pub async fn total(&self) -> Result<u64> {
        self.query().total().await
    }

    /// Creates a member of this collection.
    pub(crate) async fn create(&self, payload: Value, kind: RequestKind) -> Result<T> {
        let body = self.client.post(&self.uri, &payload, kind).await?;
        Resource::from_payload(self.client.clone(), body).map(T::from_resource)
    }
}

impl<T: Entity> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self { client: self.client.clone(), uri: self.uri.clone(), _marker: PhantomData }
    }
}

impl<T: Entity> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection").field("uri", &self.uri).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::offline_client;

    struct Probe(Resource);

    impl Entity for Probe {
        const ROOT: &'static str = "/probes";
        fn from_resource(resource: Resource) -> Self {
            Self(resource)
        }
        fn resource(&self) -> &Resource {
            &self.0
        }
        fn resource_mut(&mut self) -> &mut Resource {
            &mut self.0
        }
    }

    #[test]
    fn test_query_is_scoped_to_collection_uri() {
        let collection: Collection<Probe> =
            Collection::new(offline_client(), "/cards/CC1/debits".to_owned());
        let query = collection.query();
        assert!(format!("{query:?}").contains("/cards/CC1/debits"));
        assert!(query.filters().is_empty());
    }

    #[test]
    fn test_each_query_starts_empty() {
        let collection: Collection<Probe> =
            Collection::new(offline_client(), "/cards/CC1/debits".to_owned());
        let _narrowed = collection.query().filter("amount", 777);
        // A later query() is unaffected by what callers did with
        // earlier ones.
        assert!(collection.query().filters().is_empty());
    }
}
