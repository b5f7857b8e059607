//! The query builder.
//!
//! [`ResourceQuery`] is an immutable specification of a collection
//! lookup: an ordered list of filter predicates, at most one ordering,
//! and a page size. Every chaining call returns a *new* query value and
//! leaves the receiver untouched, so a filtered base query can be
//! branched into variants (say, two orderings) without re-deriving the
//! filters, and a query can be shared across tasks freely.
//!
//! Nothing executes until [`total`](ResourceQuery::total),
//! [`first`](ResourceQuery::first), [`all`](ResourceQuery::all) or
//! [`unique`](ResourceQuery::unique) is called. `all` drains the
//! server's pages by following `meta.next` links until exhaustion; each
//! call re-executes from the first page.

use std::{fmt, marker::PhantomData};

use serde_json::Value;

use super::{
    classify::RequestKind,
    resource::{Entity, Resource},
};
use crate::{
    client::Client,
    error::{ApiError, Result},
};

/// Page size used when the caller does not override it.
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Comparison operator of a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Equality — serialized as a bare `field=value` parameter.
    Eq,
    /// Strictly less than.
    Lt,
    /// Strictly greater than.
    Gt,
    /// Less than or equal.
    Le,
    /// Greater than or equal.
    Ge,
}

impl FilterOp {
    /// Operator spelling used in query-parameter names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for [`ResourceQuery::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// One filter term: `(field, operator, value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Field the predicate applies to.
    pub field: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Comparison value.
    pub value: Value,
}

impl Predicate {
    /// Serializes to a query parameter. Equality uses the bare field
    /// name; comparisons disambiguate with a bracketed operator, e.g.
    /// `amount[<]=800`.
    fn to_param(&self) -> (String, String) {
        let name = match self.op {
            FilterOp::Eq => self.field.clone(),
            op => format!("{}[{}]", self.field, op.as_str()),
        };
        (name, encode_value(&self.value))
    }
}

/// Query-parameter rendering of a filter value.
fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// One fetched collection page.
struct Page {
    items: Vec<Value>,
    total: u64,
    next: Option<String>,
}

/// Decodes a collection page payload.
fn parse_page(payload: Value) -> Result<Page> {
    let Value::Object(mut map) = payload else {
        return Err(ApiError::InvalidPayload("collection page is not an object".to_owned()));
    };
    let items = match map.remove("items") {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(ApiError::InvalidPayload("collection page has no items array".to_owned()));
        }
    };
    let meta = map
        .remove("meta")
        .ok_or_else(|| ApiError::InvalidPayload("collection page has no meta".to_owned()))?;
    let total = meta
        .get("total")
        .and_then(Value::as_u64)
        .ok_or_else(|| ApiError::InvalidPayload("collection meta has no total".to_owned()))?;
    let next = meta.get("next").and_then(Value::as_str).map(str::to_owned);
    Ok(Page { items, total, next })
}

/// Immutable, lazily-executed collection query.
pub struct ResourceQuery<T: Entity> {
    client: Client,
    uri: String,
    filters: Vec<Predicate>,
    ordering: Option<(String, SortDirection)>,
    page_size: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> ResourceQuery<T> {
    pub(crate) fn new(client: Client, uri: String) -> Self {
        Self {
            client,
            uri,
            filters: Vec::new(),
            ordering: None,
            page_size: DEFAULT_PAGE_SIZE,
            _marker: PhantomData,
        }
    }

    /// Adds an equality predicate. Shorthand for
    /// [`filter_op`](Self::filter_op) with [`FilterOp::Eq`].
    #[must_use]
    pub fn filter(&self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter_op(field, FilterOp::Eq, value)
    }

    /// Adds a comparison predicate. Predicates AND-combine; the same
    /// field may appear under several operators (range queries). The
    /// request carries predicates in composition order.
    #[must_use]
    pub fn filter_op(
        &self,
        field: impl Into<String>,
        op: FilterOp,
        value: impl Into<Value>,
    ) -> Self {
        let mut query = self.clone();
        query.filters.push(Predicate { field: field.into(), op, value: value.into() });
        query
    }

    /// Sets the ordering. At most one ordering is in effect — the last
    /// call wins.
    #[must_use]
    pub fn order_by(&self, field: impl Into<String>, direction: SortDirection) -> Self {
        let mut query = self.clone();
        query.ordering = Some((field.into(), direction));
        query
    }

    /// Overrides the pagination chunk size used by [`all`](Self::all).
    /// Result contents are unaffected; only the number of round trips
    /// changes.
    #[must_use]
    pub fn page_size(&self, size: u64) -> Self {
        let mut query = self.clone();
        query.page_size = size.max(1);
        query
    }

    /// Filter predicates in composition order.
    #[must_use]
    pub fn filters(&self) -> &[Predicate] {
        &self.filters
    }

    /// Query parameters this specification serializes to, excluding
    /// pagination: every predicate in composition order, then the
    /// ordering as a direction-prefixed `sort` field.
    #[must_use]
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> =
            self.filters.iter().map(Predicate::to_param).collect();
        if let Some((field, direction)) = &self.ordering {
            let value = match direction {
                SortDirection::Ascending => field.clone(),
                SortDirection::Descending => format!("-{field}"),
            };
            params.push(("sort".to_owned(), value));
        }
        params
    }

    /// Number of matching resources, without materializing them.
    ///
    /// # Errors
    ///
    /// Propagates transport and API failures as [`ApiError`].
    pub async fn total(&self) -> Result<u64> {
        Ok(self.fetch_page(1).await?.total)
    }

    /// First matching resource under the query's ordering (server
    /// default order when none is set).
    ///
    /// # Errors
    ///
    /// [`ApiError::NoResultsFound`] when nothing matches.
    pub async fn first(&self) -> Result<T> {
        let page = self.fetch_page(1).await?;
        let item = page.items.into_iter().next().ok_or(ApiError::NoResultsFound)?;
        self.materialize(item)
    }

    /// Every matching resource, in order, paginating until exhaustion.
    /// Each call re-executes the query from the first page.
    ///
    /// # Errors
    ///
    /// Propagates transport and API failures as [`ApiError`].
    pub async fn all(&self) -> Result<Vec<T>> {
        let mut page = self.fetch_page(self.page_size).await?;
        let mut results = Vec::new();
        loop {
            for item in page.items.drain(..) {
                results.push(self.materialize(item)?);
            }
            match page.next.take() {
                Some(next) => page = self.fetch_next(&next).await?,
                None => break,
            }
        }
        Ok(results)
    }

    /// The single matching resource.
    ///
    /// # Errors
    ///
    /// [`ApiError::NoResultsFound`] on zero matches;
    /// [`ApiError::MultipleResultsFound`] on more than one — the filter
    /// was underspecified.
    pub async fn unique(&self) -> Result<T> {
        let page = self.fetch_page(2).await?;
        if page.total > 1 || page.items.len() > 1 {
            return Err(ApiError::MultipleResultsFound);
        }
        let item = page.items.into_iter().next().ok_or(ApiError::NoResultsFound)?;
        self.materialize(item)
    }

    async fn fetch_page(&self, limit: u64) -> Result<Page> {
        let mut params = self.params();
        params.push(("limit".to_owned(), limit.to_string()));
        let payload = self.client.get(&self.uri, &params, RequestKind::List).await?;
        parse_page(payload)
    }

    /// Follows a server-issued `next` link verbatim; the link carries
    /// the full filter, ordering, and pagination state.
    async fn fetch_next(&self, next: &str) -> Result<Page> {
        let payload = self.client.get(next, &[], RequestKind::List).await?;
        parse_page(payload)
    }

    fn materialize(&self, item: Value) -> Result<T> {
        Resource::from_payload(self.client.clone(), item).map(T::from_resource)
    }
}

// Manual impls: deriving would demand `T: Clone`/`T: Debug`, which the
// phantom marker does not actually require.
impl<T: Entity> Clone for ResourceQuery<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            uri: self.uri.clone(),
            filters: self.filters.clone(),
            ordering: self.ordering.clone(),
            page_size: self.page_size,
            _marker: PhantomData,
        }
    }
}

impl<T: Entity> fmt::Debug for ResourceQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceQuery")
            .field("uri", &self.uri)
            .field("filters", &self.filters)
            .field("ordering", &self.ordering)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
