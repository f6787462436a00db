use crate::collection::{CollectionConfig, PagedCollection};
use crate::core::Result;
use crate::provider::ResourceProvider;
use std::sync::Arc;

/// Produces collections bound to one provider.
///
/// Every collection created here shares the same `Arc` of the provider; the
/// state of each collection is its own.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use paged_collection::{CollectionFactory, MemoryProvider};
/// let factory = CollectionFactory::new(MemoryProvider::new());
/// let first = factory.create(Some(10), None);
/// let second = factory.create(None, Some(2));
///
/// assert_eq!(first.per_page(), 10);
/// assert_eq!(second.page(), 2);
/// assert!(Arc::ptr_eq(first.provider(), factory.provider()));
/// ```
pub struct CollectionFactory<P: ResourceProvider> {
    provider: Arc<P>,
    config: CollectionConfig,
}

impl<P: ResourceProvider> CollectionFactory<P> {
    pub fn new(provider: P) -> Self {
        Self::from_arc(Arc::new(provider))
    }

    pub fn from_arc(provider: Arc<P>) -> Self {
        Self {
            provider,
            config: CollectionConfig::default(),
        }
    }

    /// Use `config` as the base for every created collection.
    pub fn with_config(provider: Arc<P>, config: CollectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// The provider shared by every created collection.
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    /// Create an empty collection; `None` or zero keep the factory defaults.
    pub fn create(&self, per_page: Option<usize>, page: Option<usize>) -> PagedCollection<P> {
        let mut config = self.config.clone();
        if let Some(per_page) = per_page.filter(|n| *n > 0) {
            config.per_page = per_page;
        }
        if let Some(page) = page.filter(|n| *n > 0) {
            config.page = page;
        }
        PagedCollection::from_config(Arc::clone(&self.provider), config)
    }

    /// Create an empty collection from an explicit configuration.
    pub fn create_with(&self, config: CollectionConfig) -> Result<PagedCollection<P>> {
        PagedCollection::with_config(Arc::clone(&self.provider), config)
    }
}

impl<P: ResourceProvider> Clone for CollectionFactory<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{LoadingPolicy, PageCountPolicy};
    use crate::provider::MemoryProvider;

    #[test]
    fn test_create_defaults() {
        let factory = CollectionFactory::new(MemoryProvider::new());
        let collection = factory.create(None, None);

        assert_eq!(collection.per_page(), 20);
        assert_eq!(collection.page(), 1);
    }

    #[test]
    fn test_collections_share_provider_not_state() {
        let factory = CollectionFactory::new(MemoryProvider::new());
        let mut first = factory.create(Some(2), None);
        let second = factory.create(Some(3), None);

        first.query_params_mut().insert("owner", "ann");
        assert!(second.query_params().is_empty());
        assert!(Arc::ptr_eq(first.provider(), second.provider()));
        assert_eq!(Arc::strong_count(factory.provider()), 3);
    }

    #[test]
    fn test_factory_config_is_inherited() {
        let config = CollectionConfig::new()
            .per_page(5)
            .loading_policy(LoadingPolicy::ResetOnError)
            .page_count(PageCountPolicy::Ceil);
        let factory = CollectionFactory::with_config(Arc::new(MemoryProvider::new()), config).unwrap();

        let collection = factory.create(None, Some(4));
        assert_eq!(collection.per_page(), 5);
        assert_eq!(collection.page(), 4);
        assert_eq!(collection.config().loading_policy, LoadingPolicy::ResetOnError);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let provider = Arc::new(MemoryProvider::new());
        let bad = CollectionConfig::new().per_page(0);
        assert!(CollectionFactory::with_config(Arc::clone(&provider), bad.clone()).is_err());

        let factory = CollectionFactory::from_arc(provider);
        assert!(factory.create_with(bad).is_err());
    }
}
