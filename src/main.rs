use estate_feed::api::HttpTransport;
use estate_feed::domain::Notices;
use estate_feed::feed::{FeedComposer, FeedEvent, ListingFetcher, SectionView};
use estate_feed::store::{FavoritesStore, LocalStore, SessionStore};
use estate_feed::{CancelToken, ClientConfig};
use std::sync::Arc;

fn main() {
    env_logger::init();

    // 1️⃣ Configuration from ESTATE_* variables
    let cfg = match ClientConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("❌ {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Device-local store (favorites, session)
    let store = match LocalStore::open(cfg.db_path.clone()) {
        Ok(store) => store,
        Err(e) => {
            log::error!("❌ Local store unavailable: {e}");
            std::process::exit(1);
        }
    };

    let transport = match HttpTransport::new(&cfg) {
        Ok(t) => t,
        Err(e) => {
            log::error!("❌ HTTP client init failed: {e}");
            std::process::exit(1);
        }
    };

    match SessionStore::new(store.clone()).load() {
        Ok(Some(user)) => {
            log::info!("signed in as {}", user.name);
            transport.set_token(user.token);
        }
        Ok(None) => log::info!("browsing signed out"),
        Err(e) => log::warn!("could not read session: {e}"),
    }

    // 3️⃣ Load the home feed once, the way the home screen does on mount
    let notices = Notices::new();
    let fetcher = ListingFetcher::new(Arc::new(transport));
    let mut feed = FeedComposer::new(fetcher, FavoritesStore::new(store), notices.clone());
    let token = CancelToken::new();

    log::info!("loading feed from {}", cfg.base_url);
    feed.load_with(&token, |event, _| {
        if let FeedEvent::SectionReady(section) = event {
            log::info!("✅ {section:?} ready");
        }
    });

    for rendered in feed.render_plan() {
        match rendered.view {
            SectionView::Items(items) => {
                println!("{:?}: {} listings", rendered.section, items.len());
                for item in items {
                    let star = if item.is_favorite { "★" } else { " " };
                    println!(
                        "  {star} {} - {} ({})",
                        item.listing.title, item.listing.price, item.listing.location.name
                    );
                }
            }
            SectionView::Empty => println!("{:?}: nothing to show", rendered.section),
            SectionView::Failed(err) => println!("{:?}: failed ({err})", rendered.section),
            SectionView::Placeholder => println!("{:?}: still loading", rendered.section),
        }
    }

    for notice in notices.drain() {
        eprintln!("⚠️ {}: {}", notice.context, notice.message);
    }
}
