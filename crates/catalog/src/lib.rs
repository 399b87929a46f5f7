//! Catalog access for the storefront.
//!
//! [`CatalogClient`](client::CatalogClient) is a single round-trip
//! primitive for card listings and filter facets. Two implementations
//! are provided: [`HttpCatalogClient`](api::HttpCatalogClient) for the
//! remote card API and [`MockCatalogClient`](mock::MockCatalogClient),
//! which filters and paginates a fixture dataset in memory. Pick one at
//! construction time with [`connect`](client::connect).
//!
//! Retries are the caller's concern; nothing here retries.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod mock;
pub mod wire;

pub use client::{connect, CatalogClient};
pub use config::{CatalogConfig, CatalogSource, LatencyRange};
pub use error::CatalogError;
