// src/feed/fetcher.rs
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::api::{endpoints, extract_list, ApiRequest, FacetOption, Listing, Transport};
use crate::cancel::{CancelToken, LoadingFlag};
use crate::domain::FilterSelection;
use crate::errors::{ClientError, ClientResult};

/// Listing and facet requests. No retries: a failure is returned to the caller as-is.
#[derive(Clone)]
pub struct ListingFetcher {
    transport: Arc<dyn Transport>,
    loading: LoadingFlag,
}

impl ListingFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            loading: LoadingFlag::default(),
        }
    }

    /// True while any request issued through this fetcher (or its clones) is pending.
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Baseline feed.
    pub fn fetch_default(&self, token: &CancelToken) -> ClientResult<Vec<Listing>> {
        self.fetch_list(ApiRequest::get(endpoints::PROPERTY_POSTS), token)
    }

    /// Search with the selection as JSON body. The selection is only read.
    pub fn fetch_filtered(
        &self,
        selection: &FilterSelection,
        token: &CancelToken,
    ) -> ClientResult<Vec<Listing>> {
        let body = serde_json::to_value(selection)?;
        self.fetch_list(ApiRequest::post(endpoints::SEARCH, body), token)
    }

    /// "See everything" after an empty search.
    pub fn fetch_all(&self, token: &CancelToken) -> ClientResult<Vec<Listing>> {
        self.fetch_list(ApiRequest::get(endpoints::SEARCH_ALL), token)
    }

    pub fn fetch_hot(&self, token: &CancelToken) -> ClientResult<Vec<Listing>> {
        self.fetch_list(ApiRequest::get(endpoints::HOT_PROPERTY_POSTS), token)
    }

    pub fn fetch_top(&self, token: &CancelToken) -> ClientResult<Vec<Listing>> {
        self.fetch_list(ApiRequest::get(endpoints::HOT_PROPERTY_POSTS_X2), token)
    }

    pub fn fetch_categories(&self, token: &CancelToken) -> ClientResult<Vec<FacetOption>> {
        self.fetch_list(ApiRequest::get(endpoints::CATEGORIES), token)
    }

    pub fn fetch_locations(&self, token: &CancelToken) -> ClientResult<Vec<FacetOption>> {
        self.fetch_list(ApiRequest::get(endpoints::LOCATIONS), token)
    }

    pub fn fetch_property_types(&self, token: &CancelToken) -> ClientResult<Vec<FacetOption>> {
        self.fetch_list(ApiRequest::get(endpoints::PROPERTY_TYPES), token)
    }

    fn fetch_list<T: DeserializeOwned>(
        &self,
        req: ApiRequest,
        token: &CancelToken,
    ) -> ClientResult<Vec<T>> {
        token.check()?;
        let _loading = self.loading.raise();

        let body = self.transport.send(&req).map_err(|e| {
            log::warn!("{} {} failed: {e}", req.method, req.path);
            e
        })?;

        // The scope may have ended while the request was in flight.
        token.check()?;

        let items = extract_list::<T>(body).map_err(|e| match e {
            ClientError::Decode(msg) => ClientError::Decode(format!("{}: {msg}", req.path)),
            other => other,
        })?;
        log::debug!("{} {} -> {} items", req.method, req.path, items.len());
        Ok(items)
    }
}
