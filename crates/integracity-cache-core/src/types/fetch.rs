//! Options and outcome of a cached fetch

use serde::Serialize;
use std::time::Duration;

/// Per-call options for a cached fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip the cache lookup and always hit the network
    pub bypass_cache: bool,
    /// TTL for the stored response instead of the endpoint table
    pub ttl: Option<Duration>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always go to the network; the fresh response still overwrites the entry
    pub fn bypass_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn ttl_secs(self, seconds: u64) -> Self {
        self.ttl(Duration::from_secs(seconds))
    }
}

/// Payload returned by a cached fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome {
    pub data: serde_json::Value,
    /// Whether `data` came from the cache rather than the network
    pub from_cache: bool,
}

impl FetchOutcome {
    pub fn cached(data: serde_json::Value) -> Self {
        Self {
            data,
            from_cache: true,
        }
    }

    pub fn fetched(data: serde_json::Value) -> Self {
        Self {
            data,
            from_cache: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let opts = FetchOptions::new();
        assert!(!opts.bypass_cache);
        assert!(opts.ttl.is_none());

        let opts = FetchOptions::new().bypass_cache().ttl_secs(10);
        assert!(opts.bypass_cache);
        assert_eq!(opts.ttl, Some(Duration::from_secs(10)));
    }
}
