//! Listing fetch pipeline: trigger -> catalog call -> retry -> publish.
//!
//! Every trigger opens a new generation. The generation number is captured
//! before the catalog is awaited and checked again, under the same lock
//! that issues generations, before anything is published. A response for
//! any generation but the latest is dropped. In-flight catalog calls are
//! never aborted; only the back-off sleep between attempts is cancelled
//! when a newer trigger supersedes it.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tcgshop_catalog::CatalogClient;
use tcgshop_core::card::{Card, CardPage};
use tcgshop_core::filter::QueryParameters;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::retry::RetryPolicy;
use crate::sync::lock;

/// Observable state of the listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum FetchState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A generation is in flight or waiting to retry.
    Loading,
    Loaded(CardPage),
    /// All attempts failed. Carries a user-facing message.
    Failed(String),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// The loaded page, if any.
    pub fn page(&self) -> Option<&CardPage> {
        match self {
            FetchState::Loaded(page) => Some(page),
            _ => None,
        }
    }

    /// Cards of the loaded page; empty in every other state.
    pub fn cards(&self) -> &[Card] {
        self.page().map(|p| p.cards.as_slice()).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

struct Generation {
    id: u64,
    /// Cancels the back-off sleep of this generation.
    cancel: CancellationToken,
    query: Option<QueryParameters>,
}

pub struct FetchCoordinator {
    client: Arc<dyn CatalogClient>,
    policy: RetryPolicy,
    current: Mutex<Generation>,
    state: watch::Sender<FetchState>,
    shutdown: CancellationToken,
}

impl FetchCoordinator {
    pub fn new(client: Arc<dyn CatalogClient>, policy: RetryPolicy) -> Arc<Self> {
        let (state, _) = watch::channel(FetchState::Idle);
        let shutdown = CancellationToken::new();
        Arc::new(Self {
            client,
            policy,
            current: Mutex::new(Generation {
                id: 0,
                cancel: shutdown.child_token(),
                query: None,
            }),
            state,
            shutdown,
        })
    }

    /// Start a new generation for `query`, superseding any earlier one.
    ///
    /// Publishes `Loading` immediately and returns the new generation number.
    /// Must be called from within a Tokio runtime.
    pub fn trigger(self: &Arc<Self>, query: QueryParameters) -> u64 {
        let (generation, cancel) = {
            let mut current = lock(&self.current);
            if self.shutdown.is_cancelled() {
                tracing::debug!("Fetch trigger ignored after shutdown");
                return current.id;
            }
            current.cancel.cancel();
            current.id += 1;
            current.cancel = self.shutdown.child_token();
            current.query = Some(query.clone());
            self.state.send_replace(FetchState::Loading);
            (current.id, current.cancel.clone())
        };

        tracing::debug!(
            generation,
            page = query.page,
            name = ?query.name_query,
            "Fetching cards",
        );

        let this = Arc::clone(self);
        tokio::spawn(async move { this.run(generation, query, cancel).await });
        generation
    }

    /// Re-issue the last query as a fresh generation with a fresh retry
    /// budget. Returns `None` if nothing has been triggered yet.
    pub fn retry(self: &Arc<Self>) -> Option<u64> {
        let query = lock(&self.current).query.clone()?;
        tracing::info!("Manual retry requested");
        Some(self.trigger(query))
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Latest generation number issued.
    pub fn generation(&self) -> u64 {
        lock(&self.current).id
    }

    /// Query of the latest generation.
    pub fn last_query(&self) -> Option<QueryParameters> {
        lock(&self.current).query.clone()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Cancel pending retries and refuse further triggers.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    // ---- private helpers ----

    async fn run(&self, generation: u64, query: QueryParameters, cancel: CancellationToken) {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return;
            }
            attempt += 1;

            match self.client.fetch_cards(&query).await {
                Ok(page) => {
                    let count = page.cards.len();
                    let total_count = page.total_count;
                    if self.publish(generation, FetchState::Loaded(page)) {
                        tracing::info!(generation, attempt, count, total_count, "Cards loaded");
                    }
                    return;
                }
                Err(err) => {
                    if !self.is_current(generation) {
                        tracing::debug!(generation, error = %err, "Dropping failure of stale generation");
                        return;
                    }

                    if attempt >= self.policy.max_attempts() {
                        let err = FetchError::Exhausted {
                            attempts: attempt,
                            last: err,
                        };
                        tracing::error!(generation, error = %err, "Card fetch failed");
                        self.publish(generation, FetchState::Failed(err.to_string()));
                        return;
                    }

                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        generation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Card fetch failed, retrying",
                    );

                    tokio::select! {
                        _ = cancel.cancelled() => {
                            tracing::debug!(generation, "Retry superseded");
                            return;
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        lock(&self.current).id == generation
    }

    /// Publish `state` iff `generation` is still the latest. The check and
    /// the publish happen under the generation lock.
    fn publish(&self, generation: u64, state: FetchState) -> bool {
        let current = lock(&self.current);
        if current.id != generation {
            tracing::debug!(
                generation,
                latest = current.id,
                "Dropping stale response",
            );
            return false;
        }
        self.state.send_replace(state);
        true
    }
}
