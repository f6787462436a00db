// ============================================================================
// paged-collection Library
// ============================================================================

//! Client-side paged collections over remote list resources.
//!
//! A [`ResourceProvider`] knows how to `list` one window of a remote
//! collection and how to `count` it. A [`PagedCollection`] drives that
//! provider: it keeps the fetched items in order, tracks the totals reported
//! by the server and offers incremental loading, full reloads, filtering,
//! page navigation, lookup and removal.
//!
//! # Examples
//!
//! ```
//! use paged_collection::{CollectionFactory, MemoryProvider, QueryParams};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> paged_collection::Result<()> {
//! let provider = MemoryProvider::from_records(vec![
//!     json!({"id": 1, "status": "open"}),
//!     json!({"id": 2, "status": "open"}),
//!     json!({"id": 3, "status": "closed"}),
//! ])?;
//! let factory = CollectionFactory::new(provider);
//! let mut tickets = factory.create(Some(1), None);
//!
//! tickets.query(Some(QueryParams::new().with("status", "open"))).await?;
//! assert_eq!(tickets.len(), 1);
//! assert_eq!(tickets.total_pages(), 2);
//!
//! tickets.load_more(None).await?;
//! assert_eq!(tickets.len(), 2);
//! assert!(tickets.find_by_id("2").is_some());
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod core;
pub mod factory;
pub mod provider;

pub use collection::{
    CollectionConfig, DEFAULT_PER_PAGE, LoadingPolicy, PageCountPolicy, PageLink, PagedCollection,
    Removal,
};
pub use crate::core::{CollectionError, QueryParams, Result, SKIP, TAKE, Value};
pub use factory::CollectionFactory;
pub use provider::{
    CountResponse, ListResponse, MemoryProvider, Record, Resource, ResourceProvider,
    TOTAL_COUNT_HEADER,
};
