pub mod actions;
pub mod api;
pub mod cancel;
pub mod comments;
pub mod config;
pub mod domain;
pub mod errors;
pub mod feed;
pub mod store;

#[cfg(test)]
mod tests;

pub use cancel::CancelToken;
pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult};
