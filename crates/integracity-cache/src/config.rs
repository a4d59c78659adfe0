//! Cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use integracity_cache_core::{CacheError, Result, TtlPolicy, duration_ms};

/// Default durable slot holding the snapshot
pub const DEFAULT_STORAGE_KEY: &str = "integracity_api_cache";

/// Configuration for [`ApiCache`](crate::ApiCache)
///
/// Durations are written in milliseconds when loaded from JSON:
///
/// ```json
/// {"defaultTtlMs": 60000, "maxCacheSize": 100, "endpointTtls": [{"pattern": "waze", "ttlMs": 30000}]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiCacheConfig {
    /// TTL for paths no endpoint rule matches
    #[serde(rename = "defaultTtlMs", with = "duration_ms")]
    pub default_ttl: Duration,
    /// Maximum number of retained entries (0 = unlimited)
    pub max_cache_size: usize,
    /// Mirror the store to durable storage after every write
    pub enable_persistence: bool,
    /// Durable slot name for the snapshot
    pub storage_key: String,
    /// Period of the expiry sweep (zero disables the sweeper)
    #[serde(rename = "sweepIntervalMs", with = "duration_ms")]
    pub sweep_interval: Duration,
    /// Endpoint → TTL table, first match wins
    pub endpoint_ttls: TtlPolicy,
    /// Initial state of per-operation debug logging
    pub debug: bool,
    /// Origin relative request paths are resolved against
    pub base_url: String,
    /// Share one network request between concurrent misses of the same key
    pub coalesce_fetches: bool,
}

impl Default for ApiCacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(60),
            max_cache_size: 100,
            enable_persistence: true,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            sweep_interval: Duration::from_secs(30),
            endpoint_ttls: TtlPolicy::default(),
            debug: false,
            base_url: "http://localhost:8000/".to_string(),
            coalesce_fetches: false,
        }
    }
}

impl ApiCacheConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| CacheError::Deserialization(e.to_string()))
    }

    /// Create config with a specific base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn max_cache_size(mut self, size: usize) -> Self {
        self.max_cache_size = size;
        self
    }

    pub fn persistence(mut self, enabled: bool) -> Self {
        self.enable_persistence = enabled;
        self
    }

    /// Disable persistence
    pub fn no_persistence(self) -> Self {
        self.persistence(false)
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn endpoint_ttls(mut self, policy: TtlPolicy) -> Self {
        self.endpoint_ttls = policy;
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Enable single-flight de-duplication of concurrent misses
    pub fn coalesce_fetches(mut self) -> Self {
        self.coalesce_fetches = true;
        self
    }

    /// TTL a write to `path` gets when no explicit TTL is given
    pub fn ttl_for(&self, path: &str) -> Duration {
        self.endpoint_ttls.resolve(path, self.default_ttl)
    }
}
