//! Client handle.
//!
//! A [`Client`] pairs an [`ApiConfig`] with a [`Transport`] and is the
//! only object that issues requests. It is cheap to clone (the transport
//! sits behind an `Arc`) and every resource, collection, and query holds
//! one, so a fetched object can keep talking to the API it came from
//! without any global state.

use std::{fmt, sync::Arc};

use serde_json::Value;

use crate::{
    config::ApiConfig,
    core::classify::{self, RequestKind},
    error::Result,
    transport::{ApiRequest, HttpTransport, Method, Transport},
};

struct ClientInner {
    config: ApiConfig,
    transport: Box<dyn Transport>,
}

/// Handle to one Payrail API account.
///
/// # Examples
///
/// ```no_run
/// use payrail::{Client, Customer, EntityOps};
///
/// # async fn example() -> payrail::Result<()> {
/// let client = Client::from_env()?;
///
/// let mut customer = Customer::new(&client);
/// customer.set_name("Ada Lovelace");
/// customer.save().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Creates a client over the production [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`](crate::ApiError::InvalidConfig)
    /// if the configuration fails validation.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a client from `PAYRAIL_API_KEY` / `PAYRAIL_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidConfig`](crate::ApiError::InvalidConfig)
    /// if the key variable is unset or the resulting configuration is
    /// invalid.
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    /// Creates a client over a caller-supplied transport.
    ///
    /// This is the seam tests use to install an in-memory fake API.
    pub fn with_transport(config: ApiConfig, transport: impl Transport + 'static) -> Self {
        Self { inner: Arc::new(ClientInner { config, transport: Box::new(transport) }) }
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
        kind: RequestKind,
    ) -> Result<Value> {
        let response = self
            .inner
            .transport
            .execute(ApiRequest { method, path, query, body })
            .await?;
        classify::check(kind, &response)
    }

    pub(crate) async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
        kind: RequestKind,
    ) -> Result<Value> {
        self.request(Method::Get, path, query, None, kind).await
    }

    pub(crate) async fn post(&self, path: &str, body: &Value, kind: RequestKind) -> Result<Value> {
        self.request(Method::Post, path, &[], Some(body), kind).await
    }

    pub(crate) async fn put(&self, path: &str, body: &Value, kind: RequestKind) -> Result<Value> {
        self.request(Method::Put, path, &[], Some(body), kind).await
    }

    pub(crate) async fn delete(&self, path: &str, kind: RequestKind) -> Result<Value> {
        self.request(Method::Delete, path, &[], None, kind).await
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.config.base_url())
            .finish_non_exhaustive()
    }
}
