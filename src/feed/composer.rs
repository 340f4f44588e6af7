// src/feed/composer.rs
use std::collections::{BTreeSet, HashSet};
use std::sync::mpsc;
use std::thread;

use crate::api::{FacetOption, Id, Listing};
use crate::cancel::CancelToken;
use crate::errors::ClientResult;
use crate::feed::fetcher::ListingFetcher;
use crate::store::FavoritesStore;
use crate::domain::Notices;

/// Listing sections of the home screen, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Boosted listings, variant A.
    Hot,
    /// Boosted "classic top" listings, variant B.
    Top,
    General,
}

impl Section {
    pub const RENDER_ORDER: [Section; 3] = [Section::Hot, Section::Top, Section::General];

    fn index(self) -> usize {
        match self {
            Section::Hot => 0,
            Section::Top => 1,
            Section::General => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Section::Hot => "Loading hot listings",
            Section::Top => "Loading top listings",
            Section::General => "Loading listings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    Categories,
    Locations,
}

#[derive(Debug, Clone, Default)]
pub struct SectionState {
    pub listings: Vec<Listing>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FacetState {
    pub options: Vec<FacetOption>,
    pub loading: bool,
}

/// Emitted after each result is applied, so a view can redraw that part only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedEvent {
    SectionReady(Section),
    FacetsReady(FacetKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub listing: Listing,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionView {
    /// Shimmer while the section's own fetch is pending.
    Placeholder,
    Failed(String),
    Empty,
    Items(Vec<FeedItem>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSection {
    pub section: Section,
    pub view: SectionView,
}

enum Loaded {
    Section(Section, ClientResult<Vec<Listing>>),
    Facets(FacetKind, ClientResult<Vec<FacetOption>>),
}

/// Home-screen state: independently loaded listing sections plus facet options.
pub struct FeedComposer {
    fetcher: ListingFetcher,
    favorites: FavoritesStore,
    notices: Notices,
    sections: [SectionState; 3],
    categories: FacetState,
    locations: FacetState,
    favorite_ids: BTreeSet<Id>,
}

impl FeedComposer {
    pub fn new(fetcher: ListingFetcher, favorites: FavoritesStore, notices: Notices) -> Self {
        Self {
            fetcher,
            favorites,
            notices,
            sections: Default::default(),
            categories: FacetState::default(),
            locations: FacetState::default(),
            favorite_ids: BTreeSet::new(),
        }
    }

    pub fn section(&self, section: Section) -> &SectionState {
        &self.sections[section.index()]
    }

    pub fn categories(&self) -> &FacetState {
        &self.categories
    }

    pub fn locations(&self) -> &FacetState {
        &self.locations
    }

    pub fn is_favorite(&self, id: &Id) -> bool {
        self.favorite_ids.contains(id)
    }

    pub fn load(&mut self, token: &CancelToken) {
        self.load_with(token, |_, _| {});
    }

    /// Screen mount: re-read favorites, then fetch every section concurrently.
    /// Each result is applied as soon as it arrives; `on_event` runs after each
    /// one with the composer in its updated state, so a view can redraw from it.
    pub fn load_with<F>(&mut self, token: &CancelToken, mut on_event: F)
    where
        F: FnMut(FeedEvent, &FeedComposer),
    {
        if token.is_cancelled() {
            return;
        }

        self.reload_favorites();

        for state in self.sections.iter_mut() {
            state.loading = true;
            state.error = None;
        }
        self.categories.loading = true;
        self.locations.loading = true;

        let fetcher = self.fetcher.clone();
        let (tx, rx) = mpsc::channel::<Loaded>();

        thread::scope(|s| {
            for section in Section::RENDER_ORDER {
                let tx = tx.clone();
                let fetcher = &fetcher;
                s.spawn(move || {
                    let result = match section {
                        Section::Hot => fetcher.fetch_hot(token),
                        Section::Top => fetcher.fetch_top(token),
                        Section::General => fetcher.fetch_default(token),
                    };
                    let _ = tx.send(Loaded::Section(section, result));
                });
            }

            for kind in [FacetKind::Categories, FacetKind::Locations] {
                let tx = tx.clone();
                let fetcher = &fetcher;
                s.spawn(move || {
                    let result = match kind {
                        FacetKind::Categories => fetcher.fetch_categories(token),
                        FacetKind::Locations => fetcher.fetch_locations(token),
                    };
                    let _ = tx.send(Loaded::Facets(kind, result));
                });
            }

            // Workers hold the only remaining senders; recv ends when all are done.
            drop(tx);

            for loaded in rx {
                if token.is_cancelled() {
                    log::debug!("feed scope ended, dropping late result");
                    continue;
                }
                let event = self.apply(loaded);
                on_event(event, &*self);
            }
        });
    }

    /// Pull-to-refresh: every section goes empty, then all fetches are reissued.
    pub fn refresh(&mut self, token: &CancelToken) {
        self.refresh_with(token, |_, _| {});
    }

    /// A refresh under an ended scope leaves the current content in place.
    pub fn refresh_with<F>(&mut self, token: &CancelToken, on_event: F)
    where
        F: FnMut(FeedEvent, &FeedComposer),
    {
        if token.is_cancelled() {
            return;
        }
        for state in self.sections.iter_mut() {
            state.listings.clear();
            state.error = None;
        }
        self.categories.options.clear();
        self.locations.options.clear();
        self.load_with(token, on_event);
    }

    /// Toggle a favorite and keep the in-memory marks in step with the store.
    pub fn toggle_favorite(&mut self, listing: &Listing) -> Option<bool> {
        match self.favorites.toggle(listing) {
            Ok(now_favorite) => {
                if now_favorite {
                    self.favorite_ids.insert(listing.id.clone());
                } else {
                    self.favorite_ids.remove(&listing.id);
                }
                Some(now_favorite)
            }
            Err(e) => {
                self.notices.report("Saving favorite", &e);
                None
            }
        }
    }

    /// Sections in fixed order. Hidden listings are dropped and a listing shown
    /// in an earlier section is not repeated further down.
    pub fn render_plan(&self) -> Vec<RenderSection> {
        let mut seen: HashSet<&Id> = HashSet::new();

        Section::RENDER_ORDER
            .iter()
            .map(|&section| {
                let state = self.section(section);
                let view = if state.loading {
                    SectionView::Placeholder
                } else {
                    let items: Vec<FeedItem> = state
                        .listings
                        .iter()
                        .filter(|l| !l.hidden)
                        .filter(|l| seen.insert(&l.id))
                        .map(|l| FeedItem {
                            listing: l.clone(),
                            is_favorite: self.favorite_ids.contains(&l.id),
                        })
                        .collect();

                    match (&state.error, items.is_empty()) {
                        (_, false) => SectionView::Items(items),
                        (Some(err), true) => SectionView::Failed(err.clone()),
                        (None, true) => SectionView::Empty,
                    }
                };
                RenderSection { section, view }
            })
            .collect()
    }

    fn reload_favorites(&mut self) {
        match self.favorites.load() {
            Ok(set) => self.favorite_ids = set.ids(),
            Err(e) => self.notices.report("Reading favorites", &e),
        }
    }

    fn apply(&mut self, loaded: Loaded) -> FeedEvent {
        match loaded {
            Loaded::Section(section, result) => {
                let state = &mut self.sections[section.index()];
                state.loading = false;
                match result {
                    Ok(listings) => {
                        log::info!("{:?} section: {} listings", section, listings.len());
                        state.listings = listings;
                        state.error = None;
                    }
                    Err(e) => {
                        // Keep whatever was shown before; the error goes to the notice channel.
                        state.error = Some(e.to_string());
                        self.notices.report(section.label(), &e);
                    }
                }
                FeedEvent::SectionReady(section)
            }
            Loaded::Facets(kind, result) => {
                let (state, context) = match kind {
                    FacetKind::Categories => (&mut self.categories, "Loading categories"),
                    FacetKind::Locations => (&mut self.locations, "Loading locations"),
                };
                state.loading = false;
                match result {
                    Ok(options) => state.options = options,
                    Err(e) => self.notices.report(context, &e),
                }
                FeedEvent::FacetsReady(kind)
            }
        }
    }
}
