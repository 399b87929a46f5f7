//! Card listings and filter facets as served by the catalog.
//!
//! A [`Card`] is an immutable value once fetched. The cart keeps its own
//! copy, so the price it charges is the one captured at add time.

use serde::{Deserialize, Serialize};

use crate::types::CardId;

/// A single trading card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique catalog identifier.
    pub id: CardId,
    /// Display name, e.g. `"Charizard"`.
    pub name: String,
    /// Hit points as printed on the card (a string on the wire).
    #[serde(default)]
    pub hp: Option<String>,
    /// Energy type tags, e.g. `["Fire"]`.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rarity: String,
    /// The expansion set this card belongs to.
    pub set: SetRef,
    /// Collector number within the set.
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub images: CardImages,
    /// Market data, absent for cards nobody has listed yet.
    #[serde(default)]
    pub cardmarket: Option<CardMarket>,
}

impl Card {
    /// Market price used for the cart: the average sell price, or `0.0`
    /// when the card carries no market data. Never negative.
    pub fn market_price(&self) -> f64 {
        self.cardmarket
            .as_ref()
            .map(|m| m.prices.average_sell_price)
            .filter(|p| p.is_finite())
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Case-insensitive membership test against the card's type tags.
    pub fn has_type(&self, card_type: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(card_type))
    }
}

/// Reference to an expansion set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub series: String,
}

impl SetRef {
    /// Sets without both an id and a name cannot be offered as a filter.
    pub fn is_selectable(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImages {
    pub small: String,
    pub large: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMarket {
    pub url: String,
    #[serde(default)]
    pub updated_at: String,
    pub prices: CardPrices,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPrices {
    #[serde(default)]
    pub average_sell_price: f64,
    #[serde(default)]
    pub low_price: f64,
    #[serde(default)]
    pub trend_price: f64,
    #[serde(default)]
    pub suggested_price: f64,
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPage {
    pub cards: Vec<Card>,
    pub page: u32,
    pub page_size: u32,
    /// Number of cards matching the filter across all pages.
    pub total_count: u64,
}

impl CardPage {
    /// Look up a card on this page by id.
    pub fn find(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }
}

/// The filterable attribute domains offered by the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub types: Vec<String>,
    pub rarities: Vec<String>,
    pub sets: Vec<SetRef>,
}

impl Facets {
    /// Drop sets that cannot be offered as a filter choice.
    pub fn selectable(mut self) -> Self {
        self.sets.retain(SetRef::is_selectable);
        self
    }
}
