//! The catalog capability and implementation selection.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tcgshop_core::card::{CardPage, Facets};
use tcgshop_core::filter::QueryParameters;

use crate::api::HttpCatalogClient;
use crate::config::{CatalogConfig, CatalogSource};
use crate::error::CatalogError;
use crate::fixtures;
use crate::mock::MockCatalogClient;

/// One round trip to a card catalog.
///
/// Implementations bound every call by their configured timeout and never
/// retry.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of cards matching `query`.
    async fn fetch_cards(&self, query: &QueryParameters) -> Result<CardPage, CatalogError>;

    /// Fetch the type, rarity and set domains offered as filters.
    async fn fetch_facets(&self) -> Result<Facets, CatalogError>;
}

/// Build the catalog implementation selected by `config.source`.
pub fn connect(config: &CatalogConfig) -> Result<Arc<dyn CatalogClient>, CatalogError> {
    match &config.source {
        CatalogSource::Mock { latency } => {
            tracing::info!(
                cards = fixtures::sample_cards().len(),
                "Using in-memory mock catalog"
            );
            Ok(Arc::new(
                MockCatalogClient::new(fixtures::sample_cards())
                    .with_latency(*latency)
                    .with_timeout(config.timeout),
            ))
        }
        CatalogSource::Remote => {
            tracing::info!(api_url = %config.api_url, "Using remote catalog");
            Ok(Arc::new(HttpCatalogClient::new(config)?))
        }
    }
}

/// Run `fut`, turning an elapsed `timeout` into [`CatalogError::Timeout`].
pub(crate) async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, CatalogError>
where
    F: Future<Output = Result<T, CatalogError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| CatalogError::Timeout)?
}
