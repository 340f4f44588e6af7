// src/feed/search.rs
use crate::api::{FacetOption, Listing};
use crate::cancel::CancelToken;
use crate::domain::{FilterAction, FilterSelection, Notices};
use crate::feed::fetcher::ListingFetcher;

/// What the result area of the search screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// Baseline feed, before any search was submitted.
    Browsing,
    /// Results of the current filter.
    Filtered,
    /// The filter matched nothing; the screen offers "see everything".
    NoMatches,
    /// Results of the "see everything" fallback.
    ShowingAll,
}

/// Search screen: the filter being edited, the facet choices, and the rendered results.
pub struct SearchSession {
    fetcher: ListingFetcher,
    notices: Notices,
    filter: FilterSelection,
    results: Vec<Listing>,
    phase: SearchPhase,
    property_types: Vec<FacetOption>,
}

impl SearchSession {
    pub fn new(fetcher: ListingFetcher, notices: Notices) -> Self {
        Self {
            fetcher,
            notices,
            filter: FilterSelection::default(),
            results: Vec::new(),
            phase: SearchPhase::Browsing,
            property_types: Vec::new(),
        }
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn results(&self) -> &[Listing] {
        &self.results
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn property_types(&self) -> &[FacetOption] {
        &self.property_types
    }

    /// Advisory: the submit button is disabled while this is true.
    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn offers_fetch_all(&self) -> bool {
        self.phase == SearchPhase::NoMatches
    }

    /// Facet edits never touch the network.
    pub fn dispatch(&mut self, action: FilterAction) {
        self.filter.apply(action);
    }

    pub fn load_default(&mut self, token: &CancelToken) {
        match self.fetcher.fetch_default(token) {
            Ok(listings) => {
                self.results = listings;
                self.phase = SearchPhase::Browsing;
            }
            Err(e) => self.notices.report("Loading listings", &e),
        }
    }

    pub fn load_property_types(&mut self, token: &CancelToken) {
        match self.fetcher.fetch_property_types(token) {
            Ok(options) => self.property_types = options,
            Err(e) => self.notices.report("Loading property types", &e),
        }
    }

    /// Explicit submit. The results are replaced only on success; an empty
    /// result switches the screen to [`SearchPhase::NoMatches`].
    pub fn submit(&mut self, token: &CancelToken) {
        match self.fetcher.fetch_filtered(&self.filter, token) {
            Ok(listings) => {
                self.phase = if listings.is_empty() {
                    SearchPhase::NoMatches
                } else {
                    SearchPhase::Filtered
                };
                log::info!("search matched {} listings", listings.len());
                self.results = listings;
            }
            Err(e) => self.notices.report("Searching", &e),
        }
    }

    /// "See everything" after an empty search.
    pub fn show_all(&mut self, token: &CancelToken) {
        match self.fetcher.fetch_all(token) {
            Ok(listings) => {
                self.results = listings;
                self.phase = SearchPhase::ShowingAll;
            }
            Err(e) => self.notices.report("Loading all listings", &e),
        }
    }
}
