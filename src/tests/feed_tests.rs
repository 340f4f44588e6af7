use crate::api::{endpoints, Id, Method};
use crate::cancel::CancelToken;
use crate::domain::{NoticeLevel, Notices};
use crate::feed::{FeedComposer, FeedEvent, ListingFetcher, Section, SectionView};
use crate::store::FavoritesStore;
use crate::tests::utils::{listing, listing_json, temp_store, FakeTransport, Reply};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn script_happy_backend(fake: &FakeTransport) {
    fake.json(Method::Get, endpoints::HOT_PROPERTY_POSTS, json!([listing_json(1, "Hot flat")]));
    fake.json(
        Method::Get,
        endpoints::HOT_PROPERTY_POSTS_X2,
        json!({ "posts": [listing_json(2, "Top villa")] }),
    );
    fake.json(
        Method::Get,
        endpoints::PROPERTY_POSTS,
        json!([listing_json(3, "Studio"), listing_json(4, "Duplex")]),
    );
    fake.json(Method::Get, endpoints::CATEGORIES, json!([{ "id": 1, "name": "Sale" }]));
    fake.json(Method::Get, endpoints::LOCATIONS, json!([{ "id": 7, "name": "Bonapriso" }]));
}

fn composer(fake: &Arc<FakeTransport>) -> (TempDir, FeedComposer, Notices, FavoritesStore) {
    let (dir, store) = temp_store();
    let favorites = FavoritesStore::new(store);
    let notices = Notices::new();
    let feed = FeedComposer::new(
        ListingFetcher::new(fake.clone()),
        favorites.clone(),
        notices.clone(),
    );
    (dir, feed, notices, favorites)
}

fn item_ids(view: &SectionView) -> Vec<String> {
    match view {
        SectionView::Items(items) => items
            .iter()
            .map(|i| i.listing.id.as_str().to_string())
            .collect(),
        other => panic!("expected items, got {other:?}"),
    }
}

#[test]
fn mount_loads_every_section_and_facet_list() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let (_dir, mut feed, notices, _) = composer(&fake);

    let mut events = Vec::new();
    feed.load_with(&CancelToken::new(), |e, _| events.push(e));

    assert_eq!(events.len(), 5);
    assert!(events.contains(&FeedEvent::SectionReady(Section::General)));
    assert_eq!(feed.section(Section::General).listings.len(), 2);
    assert!(!feed.section(Section::Hot).loading);
    assert_eq!(feed.categories().options[0].name, "Sale");
    assert_eq!(feed.locations().options[0].id, Id::from(7));
    assert!(notices.is_empty());
}

#[test]
fn render_plan_has_fixed_section_order() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let (_dir, mut feed, _, _) = composer(&fake);
    feed.load(&CancelToken::new());

    let plan = feed.render_plan();
    let order: Vec<Section> = plan.iter().map(|s| s.section).collect();
    assert_eq!(order, Section::RENDER_ORDER);
    assert_eq!(item_ids(&plan[0].view), ["1"]);
    assert_eq!(item_ids(&plan[1].view), ["2"]);
    assert_eq!(item_ids(&plan[2].view), ["3", "4"]);
}

#[test]
fn failing_section_does_not_block_the_others() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    fake.set(Method::Get, endpoints::HOT_PROPERTY_POSTS, Reply::Status(503));
    let (_dir, mut feed, notices, _) = composer(&fake);
    feed.load(&CancelToken::new());

    let plan = feed.render_plan();
    assert!(matches!(plan[0].view, SectionView::Failed(_)));
    assert_eq!(item_ids(&plan[2].view), ["3", "4"]);

    let queued = notices.drain();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].level, NoticeLevel::Error);
    assert_eq!(queued[0].context, "Loading hot listings");
}

#[test]
fn boosted_listings_are_not_repeated_and_hidden_ones_are_dropped() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let mut hidden = listing_json(4, "Duplex");
    hidden["hidden"] = json!(true);
    fake.set(
        Method::Get,
        endpoints::PROPERTY_POSTS,
        Reply::Json(json!([listing_json(1, "Hot flat"), listing_json(3, "Studio"), hidden])),
    );
    let (_dir, mut feed, _, _) = composer(&fake);
    feed.load(&CancelToken::new());

    let plan = feed.render_plan();
    assert_eq!(item_ids(&plan[0].view), ["1"]);
    assert_eq!(item_ids(&plan[2].view), ["3"]);
}

#[test]
fn favorites_are_marked_and_toggled() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let (_dir, mut feed, _, favorites) = composer(&fake);
    favorites.toggle(&listing(3, "Studio")).unwrap();

    feed.load(&CancelToken::new());
    assert!(feed.is_favorite(&Id::from(3)));

    assert_eq!(feed.toggle_favorite(&listing(4, "Duplex")), Some(true));
    assert_eq!(feed.toggle_favorite(&listing(3, "Studio")), Some(false));

    match &feed.render_plan()[2].view {
        SectionView::Items(items) => {
            let marks: Vec<bool> = items.iter().map(|i| i.is_favorite).collect();
            assert_eq!(marks, [false, true]);
        }
        other => panic!("expected items, got {other:?}"),
    }
    assert_eq!(favorites.load().unwrap().ids().len(), 1);
}

#[test]
fn refresh_clears_then_reloads() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    // Second call to the general feed comes back empty.
    fake.json(Method::Get, endpoints::PROPERTY_POSTS, json!([]));
    let (_dir, mut feed, _, _) = composer(&fake);

    feed.load(&CancelToken::new());
    assert_eq!(feed.section(Section::General).listings.len(), 2);

    let mut events = 0;
    feed.refresh_with(&CancelToken::new(), |_, _| events += 1);

    assert_eq!(events, 5);
    assert!(feed.section(Section::General).listings.is_empty());
    assert!(matches!(feed.render_plan()[2].view, SectionView::Empty));
    assert_eq!(fake.sent_to(endpoints::PROPERTY_POSTS).len(), 2);
}

#[test]
fn cancelled_scope_applies_nothing() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let (_dir, mut feed, notices, _) = composer(&fake);

    let token = CancelToken::new();
    token.cancel();
    feed.load(&token);

    assert!(fake.sent().is_empty());
    assert!(feed.section(Section::Hot).listings.is_empty());
    assert!(notices.is_empty());
}

#[test]
fn results_landing_after_unmount_are_dropped() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let token = CancelToken::new();
    let screen = token.clone();
    fake.on_send(move |_| screen.cancel());
    let (_dir, mut feed, notices, _) = composer(&fake);

    feed.load(&token);

    assert!(feed.section(Section::General).listings.is_empty());
    assert!(notices.is_empty());
}

#[test]
fn sections_still_loading_render_as_placeholders() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let (_dir, mut feed, _, _) = composer(&fake);

    let mut placeholders_seen = Vec::new();
    feed.load_with(&CancelToken::new(), |event, view| {
        let plan = view.render_plan();
        if let FeedEvent::SectionReady(ready) = event {
            let own = plan.iter().find(|s| s.section == ready).unwrap();
            assert!(!matches!(own.view, SectionView::Placeholder));
        }
        let pending = plan
            .iter()
            .filter(|s| matches!(s.view, SectionView::Placeholder))
            .count();
        placeholders_seen.push(pending);
    });

    // Only one of five results is in when the first event fires.
    assert!(placeholders_seen[0] >= 2);
    assert_eq!(*placeholders_seen.last().unwrap(), 0);
}

#[test]
fn malformed_record_leaves_the_rest_of_the_section() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let mut odd = listing_json(5, "Odd");
    odd["media"] = json!("not a list");
    fake.set(
        Method::Get,
        endpoints::PROPERTY_POSTS,
        Reply::Json(json!([listing_json(3, "Studio"), odd, listing_json(4, "Duplex")])),
    );
    let (_dir, mut feed, notices, _) = composer(&fake);
    feed.load(&CancelToken::new());

    assert_eq!(item_ids(&feed.render_plan()[2].view), ["3", "4"]);
    assert!(notices.is_empty());
}

#[test]
fn refresh_under_ended_scope_keeps_current_content() {
    let fake = FakeTransport::new();
    script_happy_backend(&fake);
    let (_dir, mut feed, _, _) = composer(&fake);
    feed.load(&CancelToken::new());

    let ended = CancelToken::new();
    ended.cancel();
    feed.refresh(&ended);

    assert_eq!(item_ids(&feed.render_plan()[2].view), ["3", "4"]);
    assert_eq!(feed.categories().options.len(), 1);
    assert_eq!(fake.sent_to(endpoints::PROPERTY_POSTS).len(), 1);
}
