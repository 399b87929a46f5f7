//! Response envelopes of the remote card API.

use serde::{Deserialize, Serialize};
use tcgshop_core::card::{Card, CardPage};

/// `GET /cards` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardsResponse {
    pub data: Vec<Card>,
    pub page: u32,
    pub page_size: u32,
    /// Number of cards in `data`.
    pub count: u32,
    pub total_count: u64,
}

impl From<CardsResponse> for CardPage {
    fn from(resp: CardsResponse) -> Self {
        CardPage {
            cards: resp.data,
            page: resp.page,
            page_size: resp.page_size,
            total_count: resp.total_count,
        }
    }
}

/// `{ "data": ... }` wrapper used by the facet endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}
