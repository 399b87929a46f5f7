//! Domain types and pure state logic for the trading-card storefront.
//!
//! Nothing in this crate performs I/O or depends on an async runtime:
//! cards and facets as fetched from the catalog, the shopping cart,
//! filter criteria and their query projection, pagination, and the
//! cart panel's visibility phases.

pub mod card;
pub mod cart;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod types;
pub mod visibility;
