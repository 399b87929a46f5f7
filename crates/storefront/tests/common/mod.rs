//! Shared test helpers for storefront integration tests.
//!
//! [`ScriptedCatalog`] plays back a queue of canned outcomes, one per
//! `fetch_cards` call, and records every call with its (paused-clock)
//! timestamp. Once the script runs out every call succeeds instantly over
//! the fixture dataset.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tcgshop_catalog::fixtures::sample_cards;
use tcgshop_catalog::mock::{derive_facets, filter_cards};
use tcgshop_catalog::{CatalogClient, CatalogError};
use tcgshop_core::card::{Card, CardImages, CardMarket, CardPage, CardPrices, Facets, SetRef};
use tcgshop_core::filter::QueryParameters;
use tokio::time::Instant;

/// One scripted `fetch_cards` response.
pub struct Step {
    pub delay: Duration,
    /// `None` succeeds over the dataset.
    pub error: Option<CatalogError>,
}

impl Step {
    pub fn ok(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            error: None,
        }
    }

    pub fn fail(delay_ms: u64, error: CatalogError) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            error: Some(error),
        }
    }
}

/// A recorded `fetch_cards` call.
#[derive(Debug, Clone)]
pub struct Call {
    pub query: QueryParameters,
    pub at: Instant,
}

pub struct ScriptedCatalog {
    cards: Vec<Card>,
    script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Call>>,
    facets_fail: bool,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::with_cards(sample_cards())
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            script: Mutex::default(),
            calls: Mutex::default(),
            facets_fail: false,
        }
    }

    pub fn failing_facets(mut self) -> Self {
        self.facets_fail = true;
        self
    }

    pub fn script(self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.script.lock().unwrap().extend(steps);
        self
    }

    pub fn push(&self, step: Step) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Name filter of every call, in call order.
    pub fn names(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.query.name_query.clone())
            .collect()
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn fetch_cards(&self, query: &QueryParameters) -> Result<CardPage, CatalogError> {
        self.calls.lock().unwrap().push(Call {
            query: query.clone(),
            at: Instant::now(),
        });
        let step = self.script.lock().unwrap().pop_front();

        match step {
            Some(Step { delay, error }) => {
                tokio::time::sleep(delay).await;
                match error {
                    Some(err) => Err(err),
                    None => Ok(filter_cards(&self.cards, query)),
                }
            }
            None => Ok(filter_cards(&self.cards, query)),
        }
    }

    async fn fetch_facets(&self) -> Result<Facets, CatalogError> {
        if self.facets_fail {
            return Err(CatalogError::RemoteStatus(500));
        }
        Ok(derive_facets(&self.cards))
    }
}

/// A minimal card priced at `price`.
pub fn priced(id: &str, name: &str, price: f64) -> Card {
    Card {
        id: id.into(),
        name: name.into(),
        hp: None,
        types: vec!["Colorless".into()],
        rarity: "Common".into(),
        set: SetRef {
            id: "test1".into(),
            name: "Test".into(),
            series: "Test".into(),
        },
        number: "1".into(),
        artist: String::new(),
        images: CardImages::default(),
        cardmarket: Some(CardMarket {
            url: String::new(),
            updated_at: String::new(),
            prices: CardPrices {
                average_sell_price: price,
                ..Default::default()
            },
        }),
    }
}

pub fn network(detail: &str) -> CatalogError {
    CatalogError::Network(detail.to_string())
}
