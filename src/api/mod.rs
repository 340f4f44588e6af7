pub mod endpoints;
pub mod models;
mod transport;

pub use models::{
    extract_list, Comment, FacetOption, Id, Listing, ListingLocation, MediaKind, MediaRef, OwnerRef,
    VerificationStatus,
};
pub use transport::{ApiRequest, HttpTransport, Method, Transport};
