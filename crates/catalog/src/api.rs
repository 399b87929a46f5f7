//! HTTP client for the remote card API.
//!
//! Wraps `GET /cards`, `/types`, `/rarities` and `/sets` using
//! [`reqwest`]. Every request carries the configured timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tcgshop_core::card::{CardPage, Facets, SetRef};
use tcgshop_core::filter::QueryParameters;

use crate::client::{bounded, CatalogClient};
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::wire::{CardsResponse, DataEnvelope};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP catalog client for a single API base URL.
pub struct HttpCatalogClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpCatalogClient {
    /// Create a client with its own connection pool.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        }
    }

    /// Base URL requests are sent to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Query-string pairs for a listing request. Absent filters are omitted.
    pub fn card_params(query: &QueryParameters) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("pageSize", query.page_size.to_string()),
        ];
        if let Some(q) = query.search_expression() {
            params.push(("q", q));
        }
        if let Some(t) = &query.card_type {
            params.push(("types", t.clone()));
        }
        if let Some(r) = &query.rarity {
            params.push(("rarities", r.clone()));
        }
        if let Some(s) = &query.set {
            params.push(("set", s.clone()));
        }
        params
    }

    // ---- private helpers ----

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, CatalogError> {
        let mut request = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .query(params);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "Catalog returned error status");
            return Err(CatalogError::RemoteStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn fetch_cards(&self, query: &QueryParameters) -> Result<CardPage, CatalogError> {
        let params = Self::card_params(query);
        let response: CardsResponse =
            bounded(self.timeout, self.get_json("/cards", &params)).await?;

        tracing::debug!(
            page = response.page,
            count = response.count,
            total_count = response.total_count,
            "Fetched cards from catalog",
        );
        Ok(response.into())
    }

    async fn fetch_facets(&self) -> Result<Facets, CatalogError> {
        let (types, rarities, sets) = bounded(self.timeout, async {
            futures::try_join!(
                self.get_json::<DataEnvelope<Vec<String>>>("/types", &[]),
                self.get_json::<DataEnvelope<Vec<String>>>("/rarities", &[]),
                self.get_json::<DataEnvelope<Vec<SetRef>>>("/sets", &[]),
            )
        })
        .await?;

        Ok(Facets {
            types: types.data,
            rarities: rarities.data,
            sets: sets.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use tcgshop_core::filter::FilterCriteria;

    use super::*;

    #[test]
    fn card_params_omit_absent_filters() {
        let query = QueryParameters::first_page(20).unwrap();
        let params = HttpCatalogClient::card_params(&query);
        assert_eq!(
            params,
            vec![("page", "1".to_string()), ("pageSize", "20".to_string())]
        );
    }

    #[test]
    fn card_params_include_every_filter() {
        let criteria = FilterCriteria {
            name: "char".into(),
            card_type: "Fire".into(),
            rarity: "Rare".into(),
            set: "base1".into(),
        };
        let query = QueryParameters::new(&criteria, 2, 10).unwrap();
        let params = HttpCatalogClient::card_params(&query);

        assert!(params.contains(&("q", "name:\"char\"".to_string())));
        assert!(params.contains(&("types", "Fire".to_string())));
        assert!(params.contains(&("rarities", "Rare".to_string())));
        assert!(params.contains(&("set", "base1".to_string())));
        assert!(params.contains(&("page", "2".to_string())));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = CatalogConfig {
            api_url: "http://localhost:9999/v2/".into(),
            ..Default::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();
        assert_eq!(client.api_url(), "http://localhost:9999/v2");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let config = CatalogConfig {
            // Port 9 (discard) on localhost is expected to refuse connections.
            api_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();
        let err = client.fetch_facets().await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_) | CatalogError::Timeout));
    }
}
