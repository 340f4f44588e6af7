mod feed_tests;
mod fetcher_tests;
pub mod utils;
