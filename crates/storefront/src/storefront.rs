//! The shared storefront handle.
//!
//! [`Storefront`] is created once via [`Storefront::start`] and handed to
//! every rendering surface as an `Arc`. It owns the single authoritative
//! filter state, fetch pipeline, cart and cart panel, and runs two
//! background tasks: the filter pump, which turns every settled criteria
//! value into a fetch, and the one-shot facet loader.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tcgshop_catalog::CatalogClient;
use tcgshop_core::card::{Card, Facets};
use tcgshop_core::cart::{CartStore, CartSummary};
use tcgshop_core::error::CoreError;
use tcgshop_core::filter::{FilterCriteria, QueryParameters};
use tcgshop_core::pagination::PageWindow;
use tcgshop_core::types::Quantity;
use tcgshop_core::visibility::{CartPhase, CartVisibilityState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::StorefrontConfig;
use crate::coordinator::{FetchCoordinator, FetchState};
use crate::error::StartError;
use crate::filter_state::FilterState;
use crate::sync::lock;
use crate::visibility::CartVisibility;

/// Filter domains offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetsState {
    /// True until the one facet load has finished, successfully or not.
    pub loading: bool,
    pub facets: Facets,
}

impl Default for FacetsState {
    fn default() -> Self {
        Self {
            loading: true,
            facets: Facets::default(),
        }
    }
}

pub struct Storefront {
    filters: Arc<FilterState>,
    fetch: Arc<FetchCoordinator>,
    cart: Mutex<CartStore>,
    cart_tx: watch::Sender<CartSummary>,
    visibility: CartVisibility,
    facets: Arc<watch::Sender<FacetsState>>,
    /// Master cancellation token -- cancelled during shutdown.
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Storefront {
    /// Build the storefront over `catalog`, issue the initial page-1 fetch
    /// and start the background tasks.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: &StorefrontConfig,
        catalog: Arc<dyn CatalogClient>,
    ) -> Result<Arc<Self>, CoreError> {
        let initial = QueryParameters::first_page(config.page_size)?;

        let filters = Arc::new(FilterState::new(config.page_size, config.debounce));
        let fetch = FetchCoordinator::new(Arc::clone(&catalog), config.retry);
        let (cart_tx, _) = watch::channel(CartSummary::default());
        let (facets, _) = watch::channel(FacetsState::default());

        let storefront = Arc::new(Self {
            filters,
            fetch,
            cart: Mutex::new(CartStore::new()),
            cart_tx,
            visibility: CartVisibility::new(config.open_delay, config.close_delay),
            facets: Arc::new(facets),
            cancel: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        });

        // Subscribe before the first fetch so no settled value is missed.
        let settled = storefront.filters.subscribe();
        storefront.fetch.trigger(initial);

        let pump = tokio::spawn(pump_filters(
            Arc::clone(&storefront.filters),
            Arc::clone(&storefront.fetch),
            settled,
            storefront.cancel.child_token(),
        ));
        let loader = tokio::spawn(load_facets(
            catalog,
            Arc::clone(&storefront.facets),
            storefront.cancel.child_token(),
        ));
        lock(&storefront.tasks).extend([pump, loader]);

        tracing::info!(
            page_size = config.page_size,
            debounce_ms = config.debounce.as_millis() as u64,
            max_retries = config.retry.max_retries,
            "Storefront started",
        );
        Ok(storefront)
    }

    /// Build the configured catalog and start over it.
    pub fn connect(config: &StorefrontConfig) -> Result<Arc<Self>, StartError> {
        let catalog = tcgshop_catalog::connect(&config.catalog)?;
        Ok(Self::start(config, catalog)?)
    }

    /// Cancel every background task and pending timer. Idempotent.
    pub fn shutdown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        self.fetch.shutdown();
        self.filters.cancel_pending();
        self.visibility.cancel_pending();
        for handle in lock(&self.tasks).drain(..) {
            handle.abort();
        }
        tracing::info!("Storefront shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    // ---- filters and listing ----

    /// Replace the filter criteria. Takes effect after the debounce period.
    pub fn set_criteria(&self, criteria: FilterCriteria) {
        self.filters.set_criteria(criteria);
    }

    pub fn clear_filters(&self) {
        self.filters.clear();
    }

    /// Criteria as last edited.
    pub fn criteria(&self) -> FilterCriteria {
        self.filters.criteria()
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.has_active_filters()
    }

    /// Jump to `page` of the applied criteria. Fetches immediately.
    pub fn set_page(&self, page: u32) -> Result<(), CoreError> {
        let query = self.filters.set_page(page)?;
        self.fetch.trigger(query);
        Ok(())
    }

    pub fn page(&self) -> u32 {
        self.filters.page()
    }

    /// Re-issue the last listing request with a fresh retry budget.
    pub fn retry(&self) -> Option<u64> {
        self.fetch.retry()
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch.state()
    }

    pub fn subscribe_fetch(&self) -> watch::Receiver<FetchState> {
        self.fetch.subscribe()
    }

    /// Page selector for the loaded listing, if one is loaded.
    pub fn pagination(&self) -> Option<PageWindow> {
        let state = self.fetch.state();
        let page = state.page()?;
        Some(PageWindow::new(
            page.page,
            page.total_count,
            self.filters.page_size(),
        ))
    }

    pub fn facets(&self) -> FacetsState {
        self.facets.borrow().clone()
    }

    pub fn subscribe_facets(&self) -> watch::Receiver<FacetsState> {
        self.facets.subscribe()
    }

    // ---- cart ----

    /// Add one of `card`. Returns the line's new quantity.
    pub fn add_to_cart(&self, card: &Card) -> Quantity {
        self.update_cart(|cart| {
            let quantity = cart.add(card);
            tracing::debug!(card_id = %card.id, quantity, "Added to cart");
            quantity
        })
    }

    /// Add one more of an item already in the cart.
    ///
    /// An id that is not in the cart but is on the loaded listing is added
    /// at quantity 1. Anything else is a no-op returning `None`.
    pub fn increase(&self, card_id: &str) -> Option<Quantity> {
        let listed = self.fetch.state().page().and_then(|p| p.find(card_id).cloned());
        self.update_cart(|cart| {
            if let Some(quantity) = cart.increase(card_id) {
                tracing::debug!(card_id, quantity, "Cart quantity increased");
                return Some(quantity);
            }
            match listed {
                Some(card) => {
                    let quantity = cart.add(&card);
                    tracing::debug!(card_id, quantity, "Increase on absent item; added from listing");
                    Some(quantity)
                }
                None => {
                    tracing::debug!(card_id, "Increase on unknown item ignored");
                    None
                }
            }
        })
    }

    /// Remove one of an item. Returns the remaining quantity, `None` once
    /// the line is gone.
    pub fn decrease(&self, card_id: &str) -> Option<Quantity> {
        self.update_cart(|cart| {
            let quantity = cart.decrease(card_id);
            tracing::debug!(card_id, ?quantity, "Cart quantity decreased");
            quantity
        })
    }

    pub fn set_quantity(&self, card_id: &str, quantity: Quantity) -> bool {
        self.update_cart(|cart| cart.set_quantity(card_id, quantity))
    }

    pub fn remove_from_cart(&self, card_id: &str) -> bool {
        self.update_cart(|cart| {
            let removed = cart.remove(card_id);
            if removed {
                tracing::debug!(card_id, "Removed from cart");
            }
            removed
        })
    }

    pub fn clear_cart(&self) {
        self.update_cart(CartStore::clear);
        tracing::debug!("Cart cleared");
    }

    pub fn is_in_cart(&self, card_id: &str) -> bool {
        lock(&self.cart).is_in_cart(card_id)
    }

    pub fn quantity_of(&self, card_id: &str) -> Quantity {
        lock(&self.cart).quantity_of(card_id)
    }

    /// Snapshot of the cart lines and totals.
    pub fn cart(&self) -> CartSummary {
        lock(&self.cart).summary()
    }

    /// Receive a fresh summary after every cart mutation.
    pub fn subscribe_cart(&self) -> watch::Receiver<CartSummary> {
        self.cart_tx.subscribe()
    }

    // ---- cart panel ----

    pub fn toggle_cart(&self) -> CartPhase {
        self.visibility.toggle()
    }

    pub fn dismiss_cart(&self) -> CartPhase {
        self.visibility.dismiss()
    }

    pub fn cart_phase(&self) -> CartPhase {
        self.visibility.phase()
    }

    pub fn cart_visibility(&self) -> CartVisibilityState {
        self.visibility.state()
    }

    /// Phases map to [`CartVisibilityState`] via [`CartPhase::visibility`].
    pub fn subscribe_cart_visibility(&self) -> watch::Receiver<CartPhase> {
        self.visibility.subscribe()
    }

    // ---- private helpers ----

    /// Apply `f` to the cart and publish the resulting summary while the
    /// cart is still locked, so summaries are published in mutation order.
    fn update_cart<R>(&self, f: impl FnOnce(&mut CartStore) -> R) -> R {
        let mut cart = lock(&self.cart);
        let result = f(&mut cart);
        self.cart_tx.send_replace(cart.summary());
        result
    }
}

impl Drop for Storefront {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Turn every settled criteria value into a fetch, including a settle back
/// to the empty criteria.
async fn pump_filters(
    filters: Arc<FilterState>,
    fetch: Arc<FetchCoordinator>,
    mut settled: watch::Receiver<FilterCriteria>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            changed = settled.changed() => {
                if changed.is_err() {
                    return;
                }
                let criteria = settled.borrow_and_update().clone();
                match filters.apply(criteria) {
                    Ok(query) => {
                        fetch.trigger(query);
                    }
                    Err(e) => tracing::warn!(error = %e, "Settled filters rejected"),
                }
            }
        }
    }
}

/// Load the facet lists once. A failure leaves them empty.
async fn load_facets(
    catalog: Arc<dyn CatalogClient>,
    tx: Arc<watch::Sender<FacetsState>>,
    cancel: CancellationToken,
) {
    let result = tokio::select! {
        _ = cancel.cancelled() => return,
        result = catalog.fetch_facets() => result,
    };

    let facets = match result {
        Ok(facets) => {
            let facets = facets.selectable();
            tracing::info!(
                types = facets.types.len(),
                rarities = facets.rarities.len(),
                sets = facets.sets.len(),
                "Facets loaded",
            );
            facets
        }
        Err(e) => {
            tracing::warn!(error = %e, "Facet load failed; filter choices will be empty");
            Facets::default()
        }
    };

    tx.send_replace(FacetsState {
        loading: false,
        facets,
    });
}
