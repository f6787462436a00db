pub mod memory;

use crate::core::{QueryParams, Result, Value};
use async_trait::async_trait;
use futures::future::BoxFuture;
use http::HeaderMap;

pub use memory::{MemoryProvider, Record};

/// An item held by a collection.
///
/// Implementors are usually thin wrappers around a server record plus
/// whatever handle they need to delete themselves remotely.
pub trait Resource: Send + Sync + 'static {
    /// Field lookup used by `find_by_type`.
    fn field(&self, key: &str) -> Option<Value>;

    /// Identity used by `remove`. `Null` when the record carries no id.
    fn id(&self) -> Value {
        self.field("id").unwrap_or(Value::Null)
    }

    /// Deletes the resource on the server.
    ///
    /// The returned future must own everything it needs: collections spawn it
    /// and never await its completion.
    fn destroy(&self) -> BoxFuture<'static, Result<()>>;
}

/// A remote, paged list of resources.
///
/// `list` must honor the `skip`/`take` window of the params as an
/// offset/limit pair; `count` must ignore it.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    type Item: Resource;

    /// Fetch one window of items matching the params.
    async fn list(&self, params: &QueryParams) -> Result<ListResponse<Self::Item>>;

    /// Total number of rows matching the filter criteria.
    async fn count(&self, params: &QueryParams) -> Result<CountResponse>;

    /// Build an item from a raw server record.
    fn instantiate(&self, raw: serde_json::Value) -> Result<Self::Item>;
}

/// Items returned by a `list` call together with the response headers.
#[derive(Debug, Clone)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub headers: HeaderMap,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            headers: HeaderMap::new(),
        }
    }

    /// Attach an `x-total-count` header.
    pub fn with_total(mut self, total: usize) -> Self {
        self.headers.insert(TOTAL_COUNT_HEADER, total.into());
        self
    }

    /// Header accessor; `None` when missing or not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of a `count` call.
#[derive(Debug, Clone)]
pub struct CountResponse {
    pub count: usize,
    pub headers: HeaderMap,
}

impl CountResponse {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            headers: HeaderMap::new(),
        }
    }
}

/// Response header carrying the total row count.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";
