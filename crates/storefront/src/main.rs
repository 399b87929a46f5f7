//! `tcgshop-headless` -- drives the storefront state core without a UI.
//!
//! Loads the first listing and the filter facets, puts the first listed
//! card in the cart twice, opens and closes the cart panel, then shuts
//! down. Useful for checking catalog connectivity and configuration.
//!
//! # Environment variables
//!
//! See [`StorefrontConfig::from_env`] for the full table. `RUST_LOG`
//! overrides the default log filter.

use std::time::Duration;

use tcgshop_core::cart::format_price;
use tcgshop_core::visibility::CartPhase;
use tcgshop_storefront::{FetchState, Storefront, StorefrontConfig};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Upper bound on waiting for any single background result.
const WAIT_LIMIT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tcgshop_storefront=info,tcgshop_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        source = ?config.catalog.source,
        api_url = %config.catalog.api_url,
        page_size = config.page_size,
        "Starting tcgshop-headless",
    );

    let storefront = Storefront::connect(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to start storefront");
        std::process::exit(1);
    });

    let listing = settle(storefront.subscribe_fetch(), |s| {
        !matches!(s, FetchState::Idle | FetchState::Loading)
    })
    .await;
    let facets = settle(storefront.subscribe_facets(), |f| !f.loading).await;

    if let Some(facets) = facets {
        tracing::info!(
            types = ?facets.facets.types,
            rarities = facets.facets.rarities.len(),
            sets = facets.facets.sets.len(),
            "Filter choices",
        );
    }

    match listing {
        Some(FetchState::Loaded(page)) => {
            tracing::info!(
                shown = page.cards.len(),
                total = page.total_count,
                "Listing loaded",
            );
            if let Some(card) = page.cards.first() {
                storefront.add_to_cart(card);
                storefront.increase(&card.id);
            }
        }
        Some(FetchState::Failed(message)) => {
            tracing::error!(%message, "Listing unavailable");
        }
        _ => tracing::error!("Timed out waiting for the listing"),
    }

    let cart = storefront.cart();
    tracing::info!(
        lines = cart.lines.len(),
        items = cart.total_items,
        total = %format_price(cart.total_price),
        "Cart",
    );

    storefront.toggle_cart();
    settle(storefront.subscribe_cart_visibility(), |p| *p == CartPhase::Open).await;
    storefront.dismiss_cart();
    settle(storefront.subscribe_cart_visibility(), |p| *p == CartPhase::Closed).await;

    storefront.shutdown();
}

/// Wait until the watched value satisfies `done`, giving up after
/// [`WAIT_LIMIT`]. Returns the satisfying value.
async fn settle<T, F>(mut rx: watch::Receiver<T>, done: F) -> Option<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let wait = async {
        loop {
            {
                let value = rx.borrow_and_update();
                if done(&value) {
                    return Some(value.clone());
                }
            }
            if rx.changed().await.is_err() {
                return None;
            }
        }
    };
    tokio::time::timeout(WAIT_LIMIT, wait).await.ok().flatten()
}
