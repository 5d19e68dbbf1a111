use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FetchError, Result};

/// Fetcher configuration.
///
/// Every field has a default, so an empty TOML document is valid:
///
/// ```
/// use molview_fetch::FetcherConfig;
///
/// let config = FetcherConfig::from_toml_str("pool_capacity = 4").unwrap();
/// assert_eq!(config.pool_capacity, 4);
/// assert_eq!(config.progress_interval_ms, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetcherConfig {
    /// Maximum number of idle transport handles kept for reuse.
    pub pool_capacity: usize,

    /// Minimum time between two transfer updates of one task, in
    /// milliseconds. Zero reports every received chunk. The final update of
    /// a transfer is always delivered.
    pub progress_interval_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            pool_capacity: Self::DEFAULT_POOL_CAPACITY,
            progress_interval_ms: 0,
        }
    }
}

impl FetcherConfig {
    pub const DEFAULT_POOL_CAPACITY: usize = 15;

    #[must_use]
    pub fn pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }

    #[must_use]
    pub fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn progress_interval_duration(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// [`FetchError::Configuration`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| FetchError::Configuration(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            FetchError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}
