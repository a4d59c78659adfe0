//! Process-scoped durable store

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use integracity_cache_core::{CacheError, DurableStore, Result};

/// In-memory slots, the process-lifetime analogue of page storage
///
/// An optional byte quota makes writes fail the way a full browser storage
/// does. Cloning creates a new handle to the SAME slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryDurableStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes that would push the total of keys and values past `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            quota_bytes: Some(bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Total bytes held by keys and values
    pub fn used_bytes(&self) -> usize {
        self.slots
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl DurableStore for MemoryDurableStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.write();
        if let Some(quota) = self.quota_bytes {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(CacheError::Storage(format!(
                    "quota exceeded: {needed} of {quota} bytes"
                )));
            }
        }
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.slots.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryDurableStore::new();
        assert_eq!(store.get_item("slot").unwrap(), None);

        store.set_item("slot", "v1").unwrap();
        store.set_item("slot", "v2").unwrap();
        assert_eq!(store.get_item("slot").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove_item("slot").unwrap();
        store.remove_item("slot").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_quota() {
        let store = MemoryDurableStore::with_quota(10);
        store.set_item("ab", "12345678").unwrap();
        assert_eq!(store.used_bytes(), 10);

        // replacing a slot only counts the new value
        store.set_item("ab", "1234").unwrap();

        let err = store.set_item("cd", "12345").unwrap_err();
        assert!(matches!(err, CacheError::Storage(_)));
        assert_eq!(store.get_item("cd").unwrap(), None);
        assert_eq!(store.get_item("ab").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_clone_shares_slots() {
        let store = MemoryDurableStore::new();
        let handle = store.clone();
        store.set_item("k", "v").unwrap();
        assert_eq!(handle.get_item("k").unwrap().as_deref(), Some("v"));
    }
}
