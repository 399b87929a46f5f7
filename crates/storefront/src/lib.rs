//! State core of the card storefront.
//!
//! A [`Storefront`](storefront::Storefront) owns one of each component and
//! is shared by every rendering surface:
//!
//! - [`FilterState`](filter_state::FilterState): current criteria and page
//!   cursor, with a debounced view of the criteria.
//! - [`FetchCoordinator`](coordinator::FetchCoordinator): turns queries into
//!   catalog calls with retry and stale-response suppression.
//! - [`CartStore`](tcgshop_core::cart::CartStore): the cart itself.
//! - [`CartVisibility`](visibility::CartVisibility): timed open/close
//!   sequencing for the cart panel.
//!
//! The library re-exports its modules for integration testing. The
//! headless driver binary lives in `main.rs`.

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod filter_state;
pub mod retry;
pub mod storefront;
mod sync;
mod timer;
pub mod visibility;

pub use config::StorefrontConfig;
pub use coordinator::{FetchCoordinator, FetchState};
pub use storefront::{FacetsState, Storefront};
