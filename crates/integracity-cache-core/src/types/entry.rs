//! Cache entry type

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached API response
///
/// Timestamps are wall-clock epoch milliseconds so entries survive a
/// round trip through durable storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T = serde_json::Value> {
    /// The cached payload
    pub data: T,
    /// When the entry was stored
    pub stored_at: u64,
    /// After this instant the entry is stale
    pub expires_at: u64,
}

impl<T> CacheEntry<T> {
    /// Create an entry stored at `now_ms` living for `ttl`
    pub fn new(data: T, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self {
            data,
            stored_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    /// Strictly past `expires_at`; an entry is still fresh at its expiry instant.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expires_at
    }

    /// Time-to-live the entry was stored with
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(self.stored_at))
    }

    /// Remaining freshness at `now_ms`, `None` once expired
    pub fn ttl_remaining(&self, now_ms: u64) -> Option<Duration> {
        if self.is_expired_at(now_ms) {
            None
        } else {
            Some(Duration::from_millis(self.expires_at - now_ms))
        }
    }

    /// Age of the entry at `now_ms`
    pub fn age(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.stored_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_entry() {
        let entry = CacheEntry::new(json!({"ok": true}), 1_000, Duration::from_secs(60));
        assert_eq!(entry.stored_at, 1_000);
        assert_eq!(entry.expires_at, 61_000);
        assert_eq!(entry.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_expiry_is_strict() {
        let entry = CacheEntry::new("v", 0, Duration::from_millis(500));
        assert!(!entry.is_expired_at(499));
        assert!(!entry.is_expired_at(500));
        assert!(entry.is_expired_at(501));
    }

    #[test]
    fn test_ttl_remaining_and_age() {
        let entry = CacheEntry::new("v", 10_000, Duration::from_secs(30));
        assert_eq!(entry.ttl_remaining(20_000), Some(Duration::from_secs(20)));
        assert_eq!(entry.ttl_remaining(40_001), None);
        assert_eq!(entry.age(25_000), Duration::from_secs(15));
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new("v", 5, Duration::MAX);
        assert_eq!(entry.expires_at, u64::MAX);
        assert!(!entry.is_expired_at(u64::MAX));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let entry = CacheEntry::new(json!([1, 2]), 1, Duration::from_millis(9));
        let encoded = serde_json::to_value(&entry).unwrap();
        assert_eq!(encoded, json!({"data": [1, 2], "storedAt": 1, "expiresAt": 10}));
    }
}
