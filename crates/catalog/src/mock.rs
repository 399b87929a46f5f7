//! In-memory catalog over a fixed dataset.
//!
//! Used for local development and tests. Filtering mirrors the remote
//! API closely enough for the storefront not to care which one it talks
//! to: name substring match ignoring case, exact case-insensitive match
//! on type, rarity and set id, then a page slice.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use tcgshop_core::card::{Card, CardPage, Facets, SetRef};
use tcgshop_core::filter::QueryParameters;

use crate::client::{bounded, CatalogClient};
use crate::config::{LatencyRange, DEFAULT_TIMEOUT};
use crate::error::CatalogError;

pub struct MockCatalogClient {
    cards: Vec<Card>,
    latency: LatencyRange,
    timeout: Duration,
}

impl MockCatalogClient {
    /// A mock over `cards` with no latency and the default timeout.
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            latency: LatencyRange::ZERO,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_latency(mut self, latency: LatencyRange) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    async fn simulate_latency(&self) {
        let delay = self.latency.sample();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Filter and paginate `cards` according to `query`.
pub fn filter_cards(cards: &[Card], query: &QueryParameters) -> CardPage {
    let needle = query.name_query.as_deref().map(str::to_lowercase);

    let matching: Vec<&Card> = cards
        .iter()
        .filter(|c| {
            needle
                .as_deref()
                .map_or(true, |n| c.name.to_lowercase().contains(n))
        })
        .filter(|c| query.card_type.as_deref().map_or(true, |t| c.has_type(t)))
        .filter(|c| {
            query
                .rarity
                .as_deref()
                .map_or(true, |r| c.rarity.eq_ignore_ascii_case(r))
        })
        .filter(|c| {
            query
                .set
                .as_deref()
                .map_or(true, |s| c.set.id.eq_ignore_ascii_case(s))
        })
        .collect();

    let total_count = matching.len() as u64;
    let window = query.window();
    let cards = matching
        .into_iter()
        .skip(window.start)
        .take(window.len())
        .cloned()
        .collect();

    CardPage {
        cards,
        page: query.page,
        page_size: query.page_size,
        total_count,
    }
}

/// Sorted distinct types, rarities and sets present in `cards`.
pub fn derive_facets(cards: &[Card]) -> Facets {
    let types: BTreeSet<&str> = cards
        .iter()
        .flat_map(|c| c.types.iter().map(String::as_str))
        .collect();
    let rarities: BTreeSet<&str> = cards
        .iter()
        .map(|c| c.rarity.as_str())
        .filter(|r| !r.is_empty())
        .collect();

    let mut sets: Vec<SetRef> = Vec::new();
    for card in cards {
        if !sets.iter().any(|s| s.id == card.set.id) {
            sets.push(card.set.clone());
        }
    }
    sets.sort_by(|a, b| a.id.cmp(&b.id));

    Facets {
        types: types.into_iter().map(str::to_string).collect(),
        rarities: rarities.into_iter().map(str::to_string).collect(),
        sets,
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    async fn fetch_cards(&self, query: &QueryParameters) -> Result<CardPage, CatalogError> {
        bounded(self.timeout, async {
            self.simulate_latency().await;
            Ok(filter_cards(&self.cards, query))
        })
        .await
    }

    async fn fetch_facets(&self) -> Result<Facets, CatalogError> {
        bounded(self.timeout, async {
            self.simulate_latency().await;
            Ok(derive_facets(&self.cards))
        })
        .await
    }
}
