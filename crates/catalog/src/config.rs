use std::time::Duration;

/// Public card API used when no base URL is configured.
pub const DEFAULT_API_URL: &str = "https://api.pokemontcg.io/v2";

/// Upper bound on a single catalog call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which catalog implementation to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// In-memory fixture dataset with simulated latency.
    Mock { latency: LatencyRange },
    /// The remote card API over HTTP.
    Remote,
}

/// Simulated round-trip latency, drawn uniformly from `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRange {
    pub min: Duration,
    pub max: Duration,
}

impl LatencyRange {
    /// No simulated latency at all.
    pub const ZERO: LatencyRange = LatencyRange {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    pub fn fixed(latency: Duration) -> Self {
        Self {
            min: latency,
            max: latency,
        }
    }

    /// Draw one latency sample. A reversed range is treated as fixed at `min`.
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        Duration::from_millis(rand::random_range(min_ms..=max_ms))
    }
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(300),
            max: Duration::from_millis(700),
        }
    }
}

/// Catalog connection settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub source: CatalogSource,
    /// Base URL of the remote API, without a trailing slash.
    pub api_url: String,
    /// Sent as `X-Api-Key` when present.
    pub api_key: Option<String>,
    /// Bound on every call, for both implementations.
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::Mock {
                latency: LatencyRange::default(),
            },
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_stays_in_range() {
        let range = LatencyRange::default();
        for _ in 0..100 {
            let d = range.sample();
            assert!(d >= range.min && d <= range.max);
        }
    }

    #[test]
    fn fixed_and_reversed_ranges_return_min() {
        assert_eq!(LatencyRange::fixed(Duration::from_millis(5)).sample(), Duration::from_millis(5));
        let reversed = LatencyRange {
            min: Duration::from_millis(9),
            max: Duration::from_millis(1),
        };
        assert_eq!(reversed.sample(), Duration::from_millis(9));
    }

    #[test]
    fn default_is_mock_with_ten_second_timeout() {
        let config = CatalogConfig::default();
        assert!(matches!(config.source, CatalogSource::Mock { .. }));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
