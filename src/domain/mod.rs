pub mod filter;
pub mod notices;
pub mod overlay;

pub use filter::{FilterAction, FilterField, FilterSelection};
pub use notices::{Notice, NoticeLevel, Notices};
pub use overlay::{Carousel, Overlay, OverlayOrchestrator};
