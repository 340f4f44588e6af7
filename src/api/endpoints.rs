//! Paths of the marketplace REST API, relative to the configured base URL.

use crate::api::models::Id;

pub const PROPERTY_POSTS: &str = "property-posts";
pub const HOT_PROPERTY_POSTS: &str = "hot-property-posts";
pub const HOT_PROPERTY_POSTS_X2: &str = "hot-property-posts-x2";
pub const SEARCH: &str = "search";
pub const SEARCH_ALL: &str = "search-all";
pub const CATEGORIES: &str = "categories";
pub const LOCATIONS: &str = "locations";
pub const PROPERTY_TYPES: &str = "property-types";
pub const COMMENT_REPLY: &str = "comment-reply";
pub const SUBMIT_MOBILE_PAYMENT: &str = "submit-mobile-payment";

pub fn post_comments(post_id: &Id) -> String {
    format!("post-comments/{post_id}")
}

pub fn toggle_hide_post(post_id: &Id) -> String {
    format!("toggle-hide-post/{post_id}")
}

pub fn bid_top_post(post_id: &Id) -> String {
    format!("bid-top-post/{post_id}")
}
