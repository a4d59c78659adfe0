//! Persisted snapshot of the whole store
//!
//! ```json
//! {"version":1,"entries":[{"key":"/api/sirenes/","data":[],"storedAt":0,"expiresAt":60000}]}
//! ```
//!
//! Entries are listed least recently used first so a restore rebuilds the
//! same recency order.

use serde::{Deserialize, Serialize};

use integracity_cache_core::{CacheEntry, CacheError, Result, Serializer};

/// Current snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// One persisted entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: String,
    #[serde(flatten)]
    pub entry: CacheEntry,
}

/// Serializable form of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub entries: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// Build from `(key, entry)` pairs in recency order
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, CacheEntry)>,
    {
        Self {
            version: SNAPSHOT_VERSION,
            entries: entries
                .into_iter()
                .map(|(key, entry)| SnapshotEntry { key, entry })
                .collect(),
        }
    }

    /// Consume into `(key, entry)` pairs
    pub fn into_entries(self) -> impl Iterator<Item = (String, CacheEntry)> {
        self.entries.into_iter().map(|e| (e.key, e.entry))
    }

    pub fn encode<S: Serializer>(&self, serializer: &S) -> Result<String> {
        serializer.serialize(self)
    }

    /// Decode and check the format version
    pub fn decode<S: Serializer>(serializer: &S, text: &str) -> Result<Self> {
        let snapshot: Snapshot = serializer.deserialize(text)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CacheError::Deserialization(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use integracity_cache_core::JsonSerializer;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_wire_format() {
        let snapshot = Snapshot::from_entries([(
            "/api/sirenes/".to_string(),
            CacheEntry::new(json!([]), 0, Duration::from_secs(60)),
        )]);
        let text = snapshot.encode(&JsonSerializer).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "version": 1,
                "entries": [
                    {"key": "/api/sirenes/", "data": [], "storedAt": 0, "expiresAt": 60000}
                ]
            })
        );

        let decoded = Snapshot::decode(&JsonSerializer, &text).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = Snapshot::decode(&JsonSerializer, r#"{"version":9,"entries":[]}"#).unwrap_err();
        assert!(matches!(err, CacheError::Deserialization(_)));
    }

    #[test]
    fn test_rejects_corrupt_text() {
        assert!(Snapshot::decode(&JsonSerializer, "{\"version\":1,").is_err());
    }

    #[test]
    fn test_into_entries_keeps_order() {
        let snapshot = Snapshot::from_entries(
            ["a", "b", "c"]
                .into_iter()
                .map(|k| (k.to_string(), CacheEntry::new(json!(k), 0, Duration::ZERO))),
        );
        let keys: Vec<String> = snapshot.into_entries().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
