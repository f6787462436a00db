use super::pagination::PageCountPolicy;
use crate::core::{CollectionError, Result};
use crate::provider::TOTAL_COUNT_HEADER;
use http::HeaderName;
use serde::Deserialize;

pub const DEFAULT_PER_PAGE: usize = 20;

/// What happens to the `loading` flag when a fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingPolicy {
    /// The flag stays set until the next successful fetch.
    #[default]
    KeepOnError,
    /// The flag is cleared before the error is returned.
    ResetOnError,
}

/// Collection configuration
///
/// Can be built in code or deserialized from the host application's settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Page size, also the default `take`
    pub per_page: usize,

    /// Initial 1-based page number
    pub page: usize,

    /// Response header read for the total row count
    pub total_count_header: String,

    /// Flag handling on failed fetches
    pub loading_policy: LoadingPolicy,

    /// How `total_pages` is derived from `total_items`
    pub page_count: PageCountPolicy,
}

impl CollectionConfig {
    pub fn new() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: 1,
            total_count_header: TOTAL_COUNT_HEADER.to_string(),
            loading_policy: LoadingPolicy::default(),
            page_count: PageCountPolicy::default(),
        }
    }

    /// Set the page size
    pub fn per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the initial page
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Set the total count header name
    pub fn total_count_header(mut self, name: &str) -> Self {
        self.total_count_header = name.to_ascii_lowercase();
        self
    }

    pub fn loading_policy(mut self, policy: LoadingPolicy) -> Self {
        self.loading_policy = policy;
        self
    }

    pub fn page_count(mut self, policy: PageCountPolicy) -> Self {
        self.page_count = policy;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(CollectionError::ConfigError(
                "per_page must be > 0".to_string(),
            ));
        }

        if self.page == 0 {
            return Err(CollectionError::ConfigError(
                "page numbers start at 1".to_string(),
            ));
        }

        if self.total_count_header.is_empty() {
            return Err(CollectionError::ConfigError(
                "total_count_header cannot be empty".to_string(),
            ));
        }

        HeaderName::from_bytes(self.total_count_header.as_bytes())?;
        Ok(())
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
