pub mod connection;
pub mod favorites;
pub mod session;

pub use connection::LocalStore;
pub use favorites::FavoritesStore;
pub use session::{SessionStore, UserSession};

/// Persistent keys shared with earlier app installs.
pub const KEY_USER_INFO: &str = "userInfo";
pub const KEY_FAVORITES: &str = "favorites";
pub const KEY_ONBOARDING_SEEN: &str = "hasSeenOnboarding";
