// src/domain/overlay.rs

use crate::api::{Id, Listing, MediaKind, MediaRef};

/// Position within a listing's media list.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    media: Vec<MediaRef>,
    index: usize,
}

impl Carousel {
    /// `None` when there is nothing to show. The start index is clamped.
    pub fn new(media: Vec<MediaRef>, start: usize) -> Option<Self> {
        if media.is_empty() {
            return None;
        }
        let index = start.min(media.len() - 1);
        Some(Self { media, index })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.media.len()
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }

    pub fn current(&self) -> &MediaRef {
        &self.media[self.index]
    }

    /// Wraps to the first item after the last.
    pub fn next(&mut self) -> &MediaRef {
        self.index = (self.index + 1) % self.media.len();
        self.current()
    }

    /// Wraps to the last item before the first.
    pub fn prev(&mut self) -> &MediaRef {
        self.index = (self.index + self.media.len() - 1) % self.media.len();
        self.current()
    }

    pub fn select(&mut self, index: usize) -> &MediaRef {
        self.index = index.min(self.media.len() - 1);
        self.current()
    }
}

/// Overlays that can sit above a listing screen, with the payload each was opened with.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    ImageViewer { listing_id: Id, carousel: Carousel },
    VideoPlayer { listing_id: Id, carousel: Carousel },
    Comments { listing_id: Id },
    Share { listing: Box<Listing> },
    Payment { listing_id: Id, amount: u64 },
    Verification { listing_id: Id },
}

impl Overlay {
    pub fn listing_id(&self) -> &Id {
        match self {
            Overlay::ImageViewer { listing_id, .. }
            | Overlay::VideoPlayer { listing_id, .. }
            | Overlay::Comments { listing_id }
            | Overlay::Payment { listing_id, .. }
            | Overlay::Verification { listing_id } => listing_id,
            Overlay::Share { listing } => &listing.id,
        }
    }
}

/// One overlay slot. Opening replaces whatever is open, so two overlays never stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayOrchestrator {
    active: Option<Overlay>,
}

impl OverlayOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Overlay> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the overlay that was displaced, if any.
    pub fn open(&mut self, overlay: Overlay) -> Option<Overlay> {
        let previous = self.active.replace(overlay);
        if let Some(prev) = &previous {
            log::debug!("overlay for {} replaced", prev.listing_id());
        }
        previous
    }

    pub fn close(&mut self) -> Option<Overlay> {
        self.active.take()
    }

    /// Tap on a media thumbnail: image viewer or video player depending on the tapped item.
    /// Returns `false` when the listing has no media.
    pub fn open_media(&mut self, listing: &Listing, index: usize) -> bool {
        let Some(carousel) = Carousel::new(listing.media.clone(), index) else {
            return false;
        };
        let listing_id = listing.id.clone();
        let overlay = match carousel.current().kind {
            MediaKind::Image => Overlay::ImageViewer {
                listing_id,
                carousel,
            },
            MediaKind::Video => Overlay::VideoPlayer {
                listing_id,
                carousel,
            },
        };
        self.open(overlay);
        true
    }

    /// Carousel of the open media overlay.
    pub fn carousel_mut(&mut self) -> Option<&mut Carousel> {
        match self.active.as_mut() {
            Some(Overlay::ImageViewer { carousel, .. })
            | Some(Overlay::VideoPlayer { carousel, .. }) => Some(carousel),
            _ => None,
        }
    }
}
