//! In-memory shopping cart.
//!
//! [`CartStore`] maps card identifiers to [`CartLine`]s. Every operation is
//! synchronous and runs to completion, so a single store can be shared
//! behind a plain mutex. Invariants held after every call:
//!
//! - at most one line per card id;
//! - every present line has quantity >= 1 (a line that would reach 0 is
//!   removed instead).

use serde::Serialize;

use crate::card::Card;
use crate::types::Quantity;

/// One entry in the cart: a snapshot of the card plus how many copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub card: Card,
    pub quantity: Quantity,
}

impl CartLine {
    /// Price of this line: the card's snapshot price times the quantity.
    pub fn subtotal(&self) -> f64 {
        self.card.market_price() * f64::from(self.quantity)
    }
}

/// Render-ready view of the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total_items: u64,
    pub total_price: f64,
}

/// The authoritative cart. Lines are kept in the order they were first added.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of `card`, creating the line at quantity 1 if needed.
    ///
    /// Returns the line's new quantity.
    pub fn add(&mut self, card: &Card) -> Quantity {
        match self.position(&card.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(1);
                line.quantity
            }
            None => {
                self.lines.push(CartLine {
                    card: card.clone(),
                    quantity: 1,
                });
                1
            }
        }
    }

    /// Increment an existing line. Returns the new quantity, or `None` when
    /// no line exists for `card_id` (the caller decides how to recover).
    pub fn increase(&mut self, card_id: &str) -> Option<Quantity> {
        let idx = self.position(card_id)?;
        let line = &mut self.lines[idx];
        line.quantity = line.quantity.saturating_add(1);
        Some(line.quantity)
    }

    /// Decrement a line, removing it when it drops to zero.
    ///
    /// Returns the remaining quantity, or `None` if the line is now absent
    /// (either removed by this call or never present).
    pub fn decrease(&mut self, card_id: &str) -> Option<Quantity> {
        let idx = self.position(card_id)?;
        if self.lines[idx].quantity <= 1 {
            self.lines.remove(idx);
            return None;
        }
        let line = &mut self.lines[idx];
        line.quantity -= 1;
        Some(line.quantity)
    }

    /// Set a line's quantity outright. Zero removes the line; an unknown id
    /// is a no-op. Returns `true` if the cart changed.
    pub fn set_quantity(&mut self, card_id: &str, quantity: Quantity) -> bool {
        if quantity == 0 {
            return self.remove(card_id);
        }
        match self.position(card_id) {
            Some(idx) if self.lines[idx].quantity != quantity => {
                self.lines[idx].quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Delete a line unconditionally. Returns `true` if one was present.
    pub fn remove(&mut self, card_id: &str) -> bool {
        match self.position(card_id) {
            Some(idx) => {
                self.lines.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_in_cart(&self, card_id: &str) -> bool {
        self.position(card_id).is_some()
    }

    /// Quantity held for `card_id`; 0 when absent.
    pub fn quantity_of(&self, card_id: &str) -> Quantity {
        self.position(card_id)
            .map(|idx| self.lines[idx].quantity)
            .unwrap_or(0)
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct cards in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            lines: self.lines.clone(),
            total_items: self.total_items(),
            total_price: self.total_price(),
        }
    }

    fn position(&self, card_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.card.id == card_id)
    }
}

/// Format a price for display, e.g. `25.0` -> `"$25.00"`.
pub fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardImages, CardMarket, CardPrices, SetRef};

    fn card(id: &str, price: f64) -> Card {
        Card {
            id: id.into(),
            name: id.into(),
            hp: None,
            types: vec![],
            rarity: "Common".into(),
            set: SetRef::default(),
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

    #[test]
    fn add_twice_and_another_card_totals() {
        let mut cart = CartStore::new();
        let a = card("A", 10.0);
        let b = card("B", 5.0);

        cart.add(&a);
        cart.add(&a);
        cart.add(&b);

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), 25.0);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity_of("A"), 2);
    }

    #[test]
    fn decrease_on_quantity_one_removes_line() {
        let mut cart = CartStore::new();
        cart.add(&card("A", 10.0));

        assert_eq!(cart.decrease("A"), None);
        assert!(cart.is_empty());
        assert!(!cart.is_in_cart("A"));
    }

    #[test]
    fn decrease_unknown_id_is_noop() {
        let mut cart = CartStore::new();
        cart.add(&card("A", 1.0));

        assert_eq!(cart.decrease("missing"), None);
        assert_eq!(cart.quantity_of("A"), 1);
    }

    #[test]
    fn increase_unknown_id_reports_absent() {
        let mut cart = CartStore::new();
        assert_eq!(cart.increase("nope"), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn increase_then_decrease_back_to_absent() {
        let mut cart = CartStore::new();
        cart.add(&card("A", 2.0));
        assert_eq!(cart.increase("A"), Some(2));
        assert_eq!(cart.increase("A"), Some(3));
        assert_eq!(cart.decrease("A"), Some(2));
        assert_eq!(cart.decrease("A"), Some(1));
        assert_eq!(cart.decrease("A"), None);
        assert!(!cart.is_in_cart("A"));
    }

    #[test]
    fn set_quantity_zero_removes() {
        let mut cart = CartStore::new();
        cart.add(&card("A", 2.0));

        assert!(cart.set_quantity("A", 4));
        assert_eq!(cart.quantity_of("A"), 4);
        assert!(cart.set_quantity("A", 0));
        assert!(!cart.is_in_cart("A"));
        assert!(!cart.set_quantity("A", 3), "absent id must stay absent");
    }

    #[test]
    fn remove_is_unconditional_and_idempotent() {
        let mut cart = CartStore::new();
        let a = card("A", 2.0);
        cart.add(&a);
        cart.add(&a);

        assert!(cart.remove("A"));
        assert!(!cart.remove("A"));
        assert!(cart.is_empty());
    }

    #[test]
    fn clear_zeroes_totals() {
        let mut cart = CartStore::new();
        cart.add(&card("A", 10.0));
        cart.add(&card("B", 5.0));
        cart.clear();

        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0.0);
    }

    #[test]
    fn price_is_snapshot_at_add_time() {
        let mut cart = CartStore::new();
        let mut a = card("A", 10.0);
        cart.add(&a);

        // A later re-fetch with a new price does not reprice the line.
        a.cardmarket.as_mut().unwrap().prices.average_sell_price = 99.0;
        cart.add(&a);

        assert_eq!(cart.quantity_of("A"), 2);
        assert_eq!(cart.total_price(), 20.0);
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = CartStore::new();
        cart.add(&card("B", 1.0));
        cart.add(&card("A", 1.0));
        cart.add(&card("B", 1.0));

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.card.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn summary_matches_accessors() {
        let mut cart = CartStore::new();
        cart.add(&card("A", 1.5));
        cart.add(&card("A", 1.5));

        let summary = cart.summary();
        assert_eq!(summary.total_items, cart.total_items());
        assert_eq!(summary.total_price, 3.0);
        assert_eq!(summary.lines[0].subtotal(), 3.0);
    }

    #[test]
    fn format_price_uses_two_decimals() {
        assert_eq!(format_price(25.0), "$25.00");
        assert_eq!(format_price(3.456), "$3.46");
    }
}
