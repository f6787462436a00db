// Fetch orchestration. Every operation here sets `loading` before calling
// the provider and clears it only after the response has been applied.

use super::{LoadingPolicy, PagedCollection};
use crate::core::{QueryParams, Result};
use crate::provider::{CountResponse, ListResponse, ResourceProvider};
use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

impl<P: ResourceProvider> PagedCollection<P> {
    /// True when another incremental fetch would be pointless: no window has
    /// been requested yet, the last window was not filled, or a short page
    /// was seen.
    pub fn all_loaded(&self) -> bool {
        match self.query_params.take() {
            None => true,
            Some(take) => take > self.items.len() || self.end_reached,
        }
    }

    /// Append the next window of `take` items (default `per_page`).
    ///
    /// Does nothing when [`all_loaded`](Self::all_loaded) holds.
    pub async fn load_more(&mut self, take: Option<usize>) -> Result<&mut Self> {
        if self.all_loaded() {
            event!(
                Level::DEBUG,
                held = self.items.len(),
                end_reached = self.end_reached,
                "load_more skipped"
            );
            return Ok(self);
        }

        let take = take.filter(|n| *n > 0).unwrap_or(self.per_page);
        let skip = self.items.len();
        self.query_params.set_take(take);
        self.query_params.set_skip(skip);

        let span = info_span!("collection.load_more", skip, take);
        let response = self.fetch().instrument(span).await?;

        if response.items.len() < take {
            self.end_reached = true;
        }
        self.set_pagination(Some(&response.headers), None);
        self.items.extend(response.items);
        self.loading = false;
        Ok(self)
    }

    /// Replace the params and reload from the first row.
    pub async fn query(&mut self, params: Option<QueryParams>) -> Result<&mut Self> {
        self.query_params = params.unwrap_or_default();
        self.query_params.set_skip(0);
        self.query_params.default_take(self.per_page);

        let span = info_span!("collection.query", take = ?self.query_params.take());
        let response = self.fetch().instrument(span).await?;
        self.replace_all(response);
        Ok(self)
    }

    /// Merge `params` into the current params and reload from the first row.
    ///
    /// The window is reset before the merge, so `skip`/`take` keys in
    /// `params` take precedence.
    pub async fn filter(&mut self, params: QueryParams) -> Result<&mut Self> {
        self.query_params.set_skip(0);
        self.query_params.default_take(self.per_page);
        self.query_params.merge(params);

        let span = info_span!("collection.filter", take = ?self.query_params.take());
        let response = self.fetch().instrument(span).await?;
        self.replace_all(response);
        Ok(self)
    }

    /// Jump to `page`, replacing the items with that page only.
    ///
    /// Returns `Ok(None)` without any side effect when `page` is outside
    /// `1..=total_pages`. Known totals are trusted: pagination is not
    /// recomputed from the response.
    pub async fn select_page(
        &mut self,
        page: usize,
        params: Option<QueryParams>,
    ) -> Result<Option<&mut Self>> {
        if page == 0 || page > self.total_pages {
            event!(
                Level::DEBUG,
                page,
                total_pages = self.total_pages,
                "select_page out of range"
            );
            return Ok(None);
        }

        if let Some(params) = params {
            self.query_params = params;
        }
        self.query_params.set_take(self.per_page);
        self.query_params.set_skip((page - 1) * self.per_page);
        self.page = page;

        let span = info_span!("collection.select_page", page, per_page = self.per_page);
        let response = self.fetch().instrument(span).await?;

        self.clear();
        self.items.extend(response.items);
        self.loading = false;
        Ok(Some(self))
    }

    /// Ask the provider for the total matching the current params.
    ///
    /// The explicit count replaces any header-derived total.
    pub async fn count(&mut self) -> Result<CountResponse> {
        let provider = Arc::clone(&self.provider);
        let response = provider
            .count(&self.query_params)
            .instrument(info_span!("collection.count"))
            .await?;

        self.set_pagination(None, Some(response.count));
        Ok(response)
    }

    /// Clear the items and repopulate from a full response.
    fn replace_all(&mut self, response: ListResponse<P::Item>) {
        self.clear();
        self.set_pagination(Some(&response.headers), None);
        self.items.extend(response.items);
        self.loading = false;
    }

    /// Issue `list` with the current params.
    ///
    /// Provider errors pass through unchanged; `loading` stays set unless the
    /// configured policy resets it.
    async fn fetch(&mut self) -> Result<ListResponse<P::Item>> {
        self.loading = true;
        let provider = Arc::clone(&self.provider);
        let result = provider.list(&self.query_params).await;

        match &result {
            Ok(response) => {
                event!(Level::DEBUG, received = response.items.len(), "list received");
            }
            Err(_) if self.config.loading_policy == LoadingPolicy::ResetOnError => {
                self.loading = false;
            }
            Err(_) => {}
        }
        result
    }
}
