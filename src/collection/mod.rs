//! Paged collection over a [`ResourceProvider`].
//!
//! A `PagedCollection` owns the items fetched so far together with the
//! pagination state reported by the server. Pagination math lives in
//! [`pagination`], fetch orchestration in [`loading`].

pub mod config;
pub mod loading;
pub mod pagination;

use crate::core::{CollectionError, QueryParams, Result, Value};
use crate::provider::{Resource, ResourceProvider};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{Level, event};

pub use config::{CollectionConfig, DEFAULT_PER_PAGE, LoadingPolicy};
pub use pagination::{PageCountPolicy, PageLink};

pub struct PagedCollection<P: ResourceProvider> {
    provider: Arc<P>,
    /// Items in server response order
    items: Vec<P::Item>,
    query_params: QueryParams,
    page: usize,
    per_page: usize,
    total_items: usize,
    total_pages: usize,
    pages: Vec<PageLink>,
    /// Set once an incremental fetch came back short
    end_reached: bool,
    loading: bool,
    config: CollectionConfig,
}

impl<P: ResourceProvider> PagedCollection<P> {
    /// Create an empty collection.
    ///
    /// `None` or zero fall back to 20 items per page and page 1.
    pub fn new(provider: Arc<P>, per_page: Option<usize>, page: Option<usize>) -> Self {
        let mut config = CollectionConfig::new();
        if let Some(per_page) = per_page.filter(|n| *n > 0) {
            config.per_page = per_page;
        }
        if let Some(page) = page.filter(|n| *n > 0) {
            config.page = page;
        }
        Self::from_config(provider, config)
    }

    /// Create an empty collection from a validated configuration.
    pub fn with_config(provider: Arc<P>, config: CollectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(provider, config))
    }

    pub(crate) fn from_config(provider: Arc<P>, config: CollectionConfig) -> Self {
        Self {
            provider,
            items: Vec::new(),
            query_params: QueryParams::new(),
            page: config.page,
            per_page: config.per_page,
            total_items: 0,
            total_pages: 0,
            pages: Vec::new(),
            end_reached: false,
            loading: false,
            config,
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    pub fn query_params_mut(&mut self) -> &mut QueryParams {
        &mut self.query_params
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn end_reached(&self) -> bool {
        self.end_reached
    }

    pub fn items(&self) -> &[P::Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, P::Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&P::Item> {
        self.items.get(index)
    }

    pub fn push(&mut self, item: P::Item) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = P::Item>) {
        self.items.extend(items);
    }

    /// Drop every item and re-arm incremental loading.
    ///
    /// Pagination counters and query params are left alone.
    pub fn clear(&mut self) {
        while self.items.pop().is_some() {}
        self.end_reached = false;
    }

    /// Replace the items with records that were already fetched.
    ///
    /// No request is made. If any record fails to build, the collection is
    /// left untouched.
    pub fn populate(&mut self, raw: Vec<serde_json::Value>) -> Result<&mut Self> {
        let built = raw
            .into_iter()
            .map(|record| self.provider.instantiate(record))
            .collect::<Result<Vec<_>>>()?;

        self.clear();
        self.items.extend(built);
        event!(Level::DEBUG, items = self.items.len(), "collection populated");
        Ok(self)
    }

    /// First item whose `key` field loosely equals `value`.
    pub fn find_by_type(&self, value: impl Into<Value>, key: &str) -> Option<&P::Item> {
        let value = value.into();
        self.items.iter().find(|item| {
            item.field(key)
                .unwrap_or(Value::Null)
                .loosely_equals(&value)
        })
    }

    /// [`find_by_type`](Self::find_by_type) on the `id` field.
    pub fn find_by_id(&self, value: impl Into<Value>) -> Option<&P::Item> {
        self.find_by_type(value, "id")
    }

    /// Drop the first item sharing `model`'s id, then delete `model` remotely.
    ///
    /// The remote delete always runs, matched or not. It is spawned on the
    /// current Tokio runtime and not awaited. Outside a runtime this fails
    /// with [`CollectionError::RuntimeError`] and the items are left alone.
    pub fn remove(&mut self, model: &P::Item) -> Result<Removal<P::Item>> {
        let runtime = Handle::try_current()
            .map_err(|err| CollectionError::RuntimeError(format!("remove: {}", err)))?;

        let id = model.id();
        let removed = self
            .items
            .iter()
            .position(|item| item.id().loosely_equals(&id))
            .map(|index| self.items.remove(index));

        event!(
            Level::DEBUG,
            id = %id,
            matched = removed.is_some(),
            "collection remove"
        );

        Ok(Removal {
            removed,
            destroy: runtime.spawn(model.destroy()),
        })
    }
}

impl<P: ResourceProvider> fmt::Debug for PagedCollection<P>
where
    P::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedCollection")
            .field("items", &self.items)
            .field("query_params", &self.query_params)
            .field("page", &self.page)
            .field("per_page", &self.per_page)
            .field("total_items", &self.total_items)
            .field("total_pages", &self.total_pages)
            .field("end_reached", &self.end_reached)
            .field("loading", &self.loading)
            .finish()
    }
}

impl<'a, P: ResourceProvider> IntoIterator for &'a PagedCollection<P> {
    type Item = &'a P::Item;
    type IntoIter = std::slice::Iter<'a, P::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Outcome of [`PagedCollection::remove`].
#[derive(Debug)]
pub struct Removal<T> {
    /// The excised local item, if one matched
    pub removed: Option<T>,
    /// The spawned remote delete
    pub destroy: JoinHandle<Result<()>>,
}

impl<T> Removal<T> {
    /// Wait for the remote delete.
    pub async fn destroyed(self) -> Result<()> {
        self.destroy
            .await
            .map_err(|err| CollectionError::ProviderError(format!("destroy task failed: {}", err)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;
    use serde_json::json;

    fn collection() -> PagedCollection<MemoryProvider> {
        PagedCollection::new(Arc::new(MemoryProvider::new()), None, None)
    }

    #[test]
    fn test_defaults() {
        let collection = collection();
        assert_eq!(collection.page(), 1);
        assert_eq!(collection.per_page(), 20);
        assert_eq!(collection.total_items(), 0);
        assert_eq!(collection.total_pages(), 0);
        assert!(collection.pages().is_empty());
        assert!(!collection.is_loading());
        assert!(!collection.end_reached());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_zero_arguments_fall_back() {
        let collection = PagedCollection::new(Arc::new(MemoryProvider::new()), Some(0), Some(0));
        assert_eq!(collection.per_page(), 20);
        assert_eq!(collection.page(), 1);

        let custom = PagedCollection::new(Arc::new(MemoryProvider::new()), Some(5), Some(3));
        assert_eq!(custom.per_page(), 5);
        assert_eq!(custom.page(), 3);
    }

    #[test]
    fn test_with_config_validates() {
        let provider = Arc::new(MemoryProvider::new());
        let invalid = CollectionConfig::new().per_page(0);
        assert!(PagedCollection::with_config(Arc::clone(&provider), invalid).is_err());

        let valid = CollectionConfig::new().per_page(7).page(2);
        let collection = PagedCollection::with_config(provider, valid).unwrap();
        assert_eq!(collection.per_page(), 7);
        assert_eq!(collection.page(), 2);
    }

    #[test]
    fn test_populate_preserves_order() {
        let mut collection = collection();
        collection
            .populate(vec![json!({"id": 3}), json!({"id": 1}), json!({"id": 2})])
            .unwrap();

        let ids: Vec<Value> = collection.iter().map(Resource::id).collect();
        assert_eq!(ids, vec![Value::Integer(3), Value::Integer(1), Value::Integer(2)]);

        collection.populate(vec![json!({"id": 9})]).unwrap();
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_populate_failure_leaves_items() {
        let mut collection = collection();
        collection.populate(vec![json!({"id": 1})]).unwrap();

        let result = collection.populate(vec![json!({"id": 2}), json!("oops")]);
        assert!(result.is_err());
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(0).unwrap().id(), Value::Integer(1));
    }

    #[test]
    fn test_clear_resets_end_reached() {
        let mut collection = collection();
        collection.populate(vec![json!({"id": 1}), json!({"id": 2})]).unwrap();
        collection.end_reached = true;

        collection.clear();
        assert!(collection.is_empty());
        assert!(!collection.end_reached());
    }

    #[test]
    fn test_find_by_type_is_loose() {
        let mut collection = collection();
        collection
            .populate(vec![
                json!({"id": 7, "slug": "seven"}),
                json!({"id": 8, "slug": "eight"}),
            ])
            .unwrap();

        assert_eq!(
            collection.find_by_type("7", "id").map(Resource::id),
            Some(Value::Integer(7))
        );
        assert_eq!(
            collection.find_by_type("eight", "slug").map(Resource::id),
            Some(Value::Integer(8))
        );
        assert!(collection.find_by_id(9).is_none());
        assert!(collection.find_by_type("x", "missing").is_none());
    }

    #[test]
    fn test_remove_outside_runtime_keeps_items() {
        let provider = Arc::new(MemoryProvider::from_records(vec![json!({"id": 7})]).unwrap());
        let mut collection = PagedCollection::new(Arc::clone(&provider), None, None);
        collection.populate(vec![json!({"id": 7})]).unwrap();

        let model = provider.instantiate(json!({"id": 7})).unwrap();
        let result = collection.remove(&model);

        assert!(matches!(result, Err(CollectionError::RuntimeError(_))));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(0).map(Resource::id), Some(Value::Integer(7)));
    }

    #[tokio::test]
    async fn test_remove_excises_one_and_destroys() {
        let provider = Arc::new(
            MemoryProvider::from_records(vec![json!({"id": 7}), json!({"id": 8})]).unwrap(),
        );
        let mut collection = PagedCollection::new(Arc::clone(&provider), None, None);
        collection
            .populate(vec![json!({"id": 7}), json!({"id": 8}), json!({"id": 7})])
            .unwrap();

        let model = provider.instantiate(json!({"id": "7"})).unwrap();
        let removal = collection.remove(&model).unwrap();

        assert!(removal.removed.is_some());
        let ids: Vec<Value> = collection.iter().map(Resource::id).collect();
        assert_eq!(ids, vec![Value::Integer(8), Value::Integer(7)]);

        removal.destroyed().await.unwrap();
        assert_eq!(provider.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_still_destroys() {
        let provider =
            Arc::new(MemoryProvider::from_records(vec![json!({"id": 42})]).unwrap());
        let mut collection = PagedCollection::new(Arc::clone(&provider), None, None);
        collection.populate(vec![json!({"id": 1})]).unwrap();

        let model = provider.instantiate(json!({"id": 42})).unwrap();
        let removal = collection.remove(&model).unwrap();

        assert!(removal.removed.is_none());
        assert_eq!(collection.len(), 1);
        removal.destroyed().await.unwrap();
        assert!(provider.is_empty().await);
    }
}
