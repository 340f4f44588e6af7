pub mod composer;
pub mod fetcher;
pub mod search;

pub use composer::{FeedComposer, FeedEvent, FeedItem, RenderSection, Section, SectionView};
pub use fetcher::ListingFetcher;
pub use search::{SearchPhase, SearchSession};
