use std::str::FromStr;
use std::time::Duration;

use tcgshop_catalog::config::DEFAULT_API_URL;
use tcgshop_catalog::{CatalogConfig, CatalogSource, LatencyRange};
use tcgshop_core::filter::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::error::ConfigError;
use crate::filter_state::DEFAULT_DEBOUNCE;
use crate::retry::RetryPolicy;
use crate::visibility::{DEFAULT_CLOSE_DELAY, DEFAULT_OPEN_DELAY};

/// Storefront configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development against the
/// mock catalog.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub catalog: CatalogConfig,
    /// Cards per listing page (default: `20`).
    pub page_size: u32,
    /// Quiet period before filter edits are applied (default: `500ms`).
    pub debounce: Duration,
    pub retry: RetryPolicy,
    /// Cart panel mount-to-animate delay (default: `10ms`).
    pub open_delay: Duration,
    /// Cart panel closing animation (default: `300ms`).
    pub close_delay: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            retry: RetryPolicy::default(),
            open_delay: DEFAULT_OPEN_DELAY,
            close_delay: DEFAULT_CLOSE_DELAY,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `CATALOG_SOURCE`       | `mock` (`mock` or `remote`)    |
    /// | `CATALOG_API_URL`      | `https://api.pokemontcg.io/v2` |
    /// | `CATALOG_API_KEY`      | unset                          |
    /// | `CATALOG_TIMEOUT_SECS` | `10`                           |
    /// | `CATALOG_PAGE_SIZE`    | `20`                           |
    /// | `MOCK_LATENCY_MIN_MS`  | `300`                          |
    /// | `MOCK_LATENCY_MAX_MS`  | `700`                          |
    /// | `FILTER_DEBOUNCE_MS`   | `500`                          |
    /// | `FETCH_MAX_RETRIES`    | `2`                            |
    /// | `FETCH_RETRY_BASE_MS`  | `1000`                         |
    /// | `CART_OPEN_DELAY_MS`   | `10`                           |
    /// | `CART_CLOSE_DELAY_MS`  | `300`                          |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let latency = LatencyRange {
            min: millis(&get, "MOCK_LATENCY_MIN_MS", LatencyRange::default().min)?,
            max: millis(&get, "MOCK_LATENCY_MAX_MS", LatencyRange::default().max)?,
        };
        if latency.max < latency.min {
            return Err(ConfigError::Invalid {
                key: "MOCK_LATENCY_MAX_MS",
                value: latency.max.as_millis().to_string(),
                reason: "must not be below MOCK_LATENCY_MIN_MS".into(),
            });
        }

        let source = match get("CATALOG_SOURCE") {
            None => CatalogSource::Mock { latency },
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "mock" => CatalogSource::Mock { latency },
                "remote" => CatalogSource::Remote,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "CATALOG_SOURCE",
                        value,
                        reason: "expected 'mock' or 'remote'".into(),
                    })
                }
            },
        };

        let timeout_secs: u64 = parsed(&get, "CATALOG_TIMEOUT_SECS", defaults.catalog.timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "CATALOG_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "must be at least 1".into(),
            });
        }

        let catalog = CatalogConfig {
            source,
            api_url: get("CATALOG_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: get("CATALOG_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        };

        let page_size: u32 = parsed(&get, "CATALOG_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid {
                key: "CATALOG_PAGE_SIZE",
                value: page_size.to_string(),
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }

        let retry = RetryPolicy {
            max_retries: parsed(&get, "FETCH_MAX_RETRIES", defaults.retry.max_retries)?,
            base_delay: millis(&get, "FETCH_RETRY_BASE_MS", defaults.retry.base_delay)?,
        };

        Ok(Self {
            catalog,
            page_size,
            debounce: millis(&get, "FILTER_DEBOUNCE_MS", defaults.debounce)?,
            retry,
            open_delay: millis(&get, "CART_OPEN_DELAY_MS", defaults.open_delay)?,
            close_delay: millis(&get, "CART_CLOSE_DELAY_MS", defaults.close_delay)?,
        })
    }
}

fn parsed<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
    }
}

fn millis<G>(get: &G, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let default_ms = default.as_millis() as u64;
    parsed(get, key, default_ms).map(Duration::from_millis)
}
