// src/store/favorites.rs
use std::collections::BTreeSet;

use crate::api::{Id, Listing};
use crate::errors::ClientError;
use crate::store::{LocalStore, KEY_FAVORITES};

/// Favorited listings in the order they were added. Membership is by `id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteSet {
    listings: Vec<Listing>,
}

impl FavoriteSet {
    pub fn contains(&self, id: &Id) -> bool {
        self.listings.iter().any(|l| &l.id == id)
    }

    pub fn ids(&self) -> BTreeSet<Id> {
        self.listings.iter().map(|l| l.id.clone()).collect()
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Add if absent, remove if present. Returns the new membership.
    fn toggle(&mut self, listing: &Listing) -> bool {
        let before = self.listings.len();
        self.listings.retain(|l| l.id != listing.id);
        if self.listings.len() == before {
            self.listings.push(listing.clone());
            true
        } else {
            false
        }
    }
}

/// Persisted favorites, read fresh from the local store on every call.
#[derive(Clone, Debug)]
pub struct FavoritesStore {
    store: LocalStore,
}

impl FavoritesStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Absent or malformed content loads as an empty set.
    pub fn load(&self) -> Result<FavoriteSet, ClientError> {
        match self.store.get_json::<Vec<Listing>>(KEY_FAVORITES) {
            Ok(Some(listings)) => Ok(FavoriteSet { listings }),
            Ok(None) => Ok(FavoriteSet::default()),
            Err(ClientError::Decode(msg)) => {
                log::warn!("ignoring unreadable favorites: {msg}");
                Ok(FavoriteSet::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Read-modify-write of the whole set. Returns whether `listing` is now a favorite.
    pub fn toggle(&self, listing: &Listing) -> Result<bool, ClientError> {
        let mut set = self.load()?;
        let now_favorite = set.toggle(listing);
        self.store.put_json(KEY_FAVORITES, &set.listings)?;
        log::debug!(
            "favorite {} -> {} ({} saved)",
            listing.id,
            now_favorite,
            set.len()
        );
        Ok(now_favorite)
    }

    pub fn contains(&self, id: &Id) -> Result<bool, ClientError> {
        Ok(self.load()?.contains(id))
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        self.store.remove(KEY_FAVORITES)
    }
}
