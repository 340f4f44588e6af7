use crate::api::{endpoints, Id, Method, VerificationStatus};
use crate::cancel::CancelToken;
use crate::domain::{FilterAction, FilterSelection};
use crate::errors::ClientError;
use crate::feed::ListingFetcher;
use crate::tests::utils::{listing_json, FakeTransport, Reply};
use serde_json::json;

#[test]
fn default_fetch_decodes_a_bare_array() {
    let fake = FakeTransport::new();
    fake.json(
        Method::Get,
        endpoints::PROPERTY_POSTS,
        json!([listing_json(1, "Flat"), listing_json(2, "House")]),
    );
    let fetcher = ListingFetcher::new(fake.clone());

    let listings = fetcher.fetch_default(&CancelToken::new()).unwrap();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0].id, Id::from("1"));
    assert_eq!(listings[1].verification, VerificationStatus::Verified);
    assert_eq!(listings[0].location.location_id, Some(Id::from(7)));
}

#[test]
fn wrapped_collections_and_loose_prices_decode() {
    let fake = FakeTransport::new();
    fake.json(
        Method::Get,
        endpoints::SEARCH_ALL,
        json!({ "data": [{ "_id": "a1", "title": "Studio", "price": "75,000", "verification": "gold" }] }),
    );
    let fetcher = ListingFetcher::new(fake.clone());

    let listings = fetcher.fetch_all(&CancelToken::new()).unwrap();
    assert_eq!(listings[0].id, Id::from("a1"));
    assert_eq!(listings[0].price, 75000.0);
    assert_eq!(listings[0].verification, VerificationStatus::Unknown);
    assert!(listings[0].media.is_empty());
}

#[test]
fn filtered_fetch_posts_the_selection_without_changing_it() {
    let fake = FakeTransport::new();
    fake.json(Method::Post, endpoints::SEARCH, json!([listing_json(3, "Villa")]));
    let fetcher = ListingFetcher::new(fake.clone());

    let filter = FilterSelection::default()
        .reduce(FilterAction::ToggleLocation(Id::from(7)))
        .reduce(FilterAction::ToggleBedroomCount(3));
    let snapshot = filter.clone();

    fetcher.fetch_filtered(&filter, &CancelToken::new()).unwrap();
    fetcher.fetch_filtered(&filter, &CancelToken::new()).unwrap();

    assert_eq!(filter, snapshot);
    let sent = fake.sent_to(endpoints::SEARCH);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].method, Method::Post);
    assert_eq!(
        sent[0].body,
        Some(json!({ "locationIds": ["7"], "bedrooms": [3] }))
    );
}

#[test]
fn cancelled_scope_sends_nothing() {
    let fake = FakeTransport::new();
    let fetcher = ListingFetcher::new(fake.clone());
    let token = CancelToken::new();
    token.cancel();

    let err = fetcher.fetch_default(&token).unwrap_err();
    assert!(err.is_cancelled());
    assert!(fake.sent().is_empty());
}

#[test]
fn response_landing_after_cancel_is_discarded() {
    let fake = FakeTransport::new();
    fake.json(Method::Get, endpoints::PROPERTY_POSTS, json!([listing_json(1, "Flat")]));
    let token = CancelToken::new();
    let in_flight = token.clone();
    fake.on_send(move |_| in_flight.cancel());

    let fetcher = ListingFetcher::new(fake.clone());
    let err = fetcher.fetch_default(&token).unwrap_err();
    assert!(matches!(err, ClientError::Cancelled));
    assert_eq!(fake.sent().len(), 1);
}

#[test]
fn loading_flag_clears_after_failure() {
    let fake = FakeTransport::new();
    fake.reply(Method::Get, endpoints::PROPERTY_POSTS, Reply::NetworkDown);
    let fetcher = ListingFetcher::new(fake.clone());

    let observer = fetcher.clone();
    let seen_loading = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let flag = seen_loading.clone();
    fake.on_send(move |_| {
        flag.store(observer.is_loading(), std::sync::atomic::Ordering::SeqCst)
    });

    let err = fetcher.fetch_default(&CancelToken::new()).unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(seen_loading.load(std::sync::atomic::Ordering::SeqCst));
    assert!(!fetcher.is_loading());
}

#[test]
fn http_errors_keep_status_and_path() {
    let fake = FakeTransport::new();
    fake.reply(Method::Get, endpoints::CATEGORIES, Reply::Status(500));
    let fetcher = ListingFetcher::new(fake.clone());

    match fetcher.fetch_categories(&CancelToken::new()) {
        Err(ClientError::Status { status, path, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(path, endpoints::CATEGORIES);
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn facet_options_accept_title_alias() {
    let fake = FakeTransport::new();
    fake.json(
        Method::Get,
        endpoints::PROPERTY_TYPES,
        json!({ "results": [{ "id": 1, "title": "Apartment" }, { "id": 2, "name": "Land" }] }),
    );
    let fetcher = ListingFetcher::new(fake.clone());

    let options = fetcher.fetch_property_types(&CancelToken::new()).unwrap();
    let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Apartment", "Land"]);
}

#[test]
fn non_collection_body_is_a_decode_error() {
    let fake = FakeTransport::new();
    fake.json(Method::Get, endpoints::LOCATIONS, json!({ "message": "ok" }));
    let fetcher = ListingFetcher::new(fake.clone());

    let err = fetcher.fetch_locations(&CancelToken::new()).unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[test]
fn loose_counts_and_text_location_decode() {
    let fake = FakeTransport::new();
    let mut loose = listing_json(2, "House");
    loose["bedrooms"] = json!("3");
    loose["bathrooms"] = json!(300);
    loose["area"] = json!("120.5");
    loose["location"] = json!("Akwa");
    fake.json(Method::Get, endpoints::PROPERTY_POSTS, json!([loose]));
    let fetcher = ListingFetcher::new(fake.clone());

    let listings = fetcher.fetch_default(&CancelToken::new()).unwrap();
    assert_eq!(listings[0].bedrooms, Some(3));
    assert_eq!(listings[0].bathrooms, None);
    assert_eq!(listings[0].area, Some(120.5));
    assert_eq!(listings[0].location.name, "Akwa");
    assert_eq!(listings[0].location.location_id, None);
}

#[test]
fn one_bad_record_does_not_sink_the_response() {
    let fake = FakeTransport::new();
    let mut bad = listing_json(2, "House");
    bad["media"] = json!([{ "kind": "hologram", "url": "x" }]);
    fake.json(
        Method::Get,
        endpoints::PROPERTY_POSTS,
        json!([listing_json(1, "Flat"), bad, listing_json(3, "Villa")]),
    );
    let fetcher = ListingFetcher::new(fake.clone());

    let listings = fetcher.fetch_default(&CancelToken::new()).unwrap();
    let ids: Vec<&str> = listings.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["1", "3"]);
}
