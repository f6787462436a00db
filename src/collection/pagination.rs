use super::PagedCollection;
use crate::provider::ResourceProvider;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

/// Rule turning a row total into a page total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCountPolicy {
    /// `total / per_page`, rounding down. A trailing partial page is not counted.
    #[default]
    Truncate,
    /// `total / per_page`, rounding up.
    Ceil,
}

impl PageCountPolicy {
    /// Page total for `total_items` rows. Never less than 1.
    pub fn total_pages(self, total_items: usize, per_page: usize) -> usize {
        if total_items < per_page {
            return 1;
        }
        match self {
            Self::Truncate => total_items / per_page,
            Self::Ceil => total_items.div_ceil(per_page),
        }
    }
}

/// Display descriptor for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub label: String,
}

impl PageLink {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            label: number.to_string(),
        }
    }
}

impl<P: ResourceProvider> PagedCollection<P> {
    /// Update the totals from a response.
    ///
    /// An explicit `count` wins over the total-count header; when neither
    /// yields a number the previous total is kept, but `total_pages` and
    /// `pages` are still recomputed. Returns `false` without touching
    /// anything when both inputs are absent.
    pub fn set_pagination(&mut self, headers: Option<&HeaderMap>, count: Option<usize>) -> bool {
        if headers.is_none() && count.is_none() {
            return false;
        }

        let from_header = headers.and_then(|headers| self.header_total(headers));
        self.total_items = count.or(from_header).unwrap_or(self.total_items);
        self.total_pages = self
            .config
            .page_count
            .total_pages(self.total_items, self.per_page);
        self.pages = (1..=self.total_pages).map(PageLink::new).collect();

        event!(
            Level::DEBUG,
            total_items = self.total_items,
            total_pages = self.total_pages,
            "pagination updated"
        );
        true
    }

    fn header_total(&self, headers: &HeaderMap) -> Option<usize> {
        headers
            .get(self.config.total_count_header.as_str())
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn pages(&self) -> &[PageLink] {
        &self.pages
    }

    /// On the first page
    pub fn no_previous(&self) -> bool {
        self.page == 1
    }

    /// On the last known page
    pub fn no_next(&self) -> bool {
        self.page == self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MemoryProvider, TOTAL_COUNT_HEADER};
    use std::sync::Arc;

    fn collection(per_page: usize) -> PagedCollection<MemoryProvider> {
        PagedCollection::new(Arc::new(MemoryProvider::new()), Some(per_page), None)
    }

    fn total_header(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TOTAL_COUNT_HEADER, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_truncating_page_count() {
        let policy = PageCountPolicy::Truncate;
        assert_eq!(policy.total_pages(45, 20), 2);
        assert_eq!(policy.total_pages(15, 20), 1);
        assert_eq!(policy.total_pages(40, 20), 2);
        assert_eq!(policy.total_pages(0, 20), 1);
        assert_eq!(policy.total_pages(5, 2), 2);
    }

    #[test]
    fn test_ceiling_page_count() {
        let policy = PageCountPolicy::Ceil;
        assert_eq!(policy.total_pages(45, 20), 3);
        assert_eq!(policy.total_pages(40, 20), 2);
        assert_eq!(policy.total_pages(15, 20), 1);
    }

    #[test]
    fn test_nothing_to_update() {
        let mut collection = collection(20);
        assert!(!collection.set_pagination(None, None));
        assert_eq!(collection.total_pages(), 0);
        assert!(collection.pages().is_empty());
    }

    #[test]
    fn test_header_total() {
        let mut collection = collection(20);
        assert!(collection.set_pagination(Some(&total_header("45")), None));

        assert_eq!(collection.total_items(), 45);
        assert_eq!(collection.total_pages(), 2);
        assert_eq!(
            collection.pages(),
            &[PageLink::new(1), PageLink::new(2)][..]
        );
        assert_eq!(collection.pages()[1].label, "2");
    }

    #[test]
    fn test_explicit_count_wins() {
        let mut collection = collection(20);
        collection.set_pagination(Some(&total_header("45")), Some(60));
        assert_eq!(collection.total_items(), 60);
        assert_eq!(collection.total_pages(), 3);
    }

    #[test]
    fn test_missing_header_keeps_total() {
        let mut collection = collection(10);
        collection.set_pagination(None, Some(35));

        collection.set_pagination(Some(&HeaderMap::new()), None);
        assert_eq!(collection.total_items(), 35);
        assert_eq!(collection.total_pages(), 3);

        collection.set_pagination(Some(&total_header("lots")), None);
        assert_eq!(collection.total_items(), 35);
    }

    #[test]
    fn test_page_bounds_helpers() {
        let mut collection = collection(10);
        assert!(collection.no_previous());
        assert!(!collection.no_next());

        collection.set_pagination(None, Some(5));
        assert!(collection.no_next());
    }
}
