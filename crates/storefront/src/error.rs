use tcgshop_catalog::CatalogError;
use tcgshop_core::error::CoreError;

/// Errors surfaced by the fetch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Every attempt of a generation failed.
    #[error("Failed to fetch cards after {attempts} attempts. {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: CatalogError,
    },
}

/// Invalid configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors building a [`Storefront`](crate::storefront::Storefront).
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Core(#[from] CoreError),
}
