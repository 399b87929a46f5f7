//! Errors from a single catalog round trip.
//!
//! Display strings are user-facing: they end up in the listing's failed
//! state verbatim.

/// Errors from the catalog layer.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The call did not complete within the configured timeout.
    #[error("Request timeout. Please try again.")]
    Timeout,

    /// Transport failure (connect, DNS, TLS, reset, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The catalog answered with a non-2xx status code.
    #[error("API request failed with status {0}")]
    RemoteStatus(u16),

    /// A success response whose body did not match the expected shape.
    #[error("Unexpected catalog response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::RemoteStatus(status.as_u16())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}
