//! Recency-ordered in-memory store using an unbounded `LruCache`

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use integracity_cache_core::{CacheEntry, CacheStats};

/// Configuration for the memory store
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of entries (0 = unlimited)
    pub max_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { max_capacity: 100 }
    }
}

impl MemoryConfig {
    /// Create config with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            max_capacity: capacity,
        }
    }

    /// Create config with unlimited capacity
    pub fn unlimited() -> Self {
        Self { max_capacity: 0 }
    }
}

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Fresh entry; it is now the most recently used
    Hit(CacheEntry),
    /// No entry under the key
    Miss,
    /// Entry was stale and has been removed
    Expired,
}

impl Lookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    /// Extract the payload of a hit
    pub fn data(self) -> Option<serde_json::Value> {
        match self {
            Lookup::Hit(entry) => Some(entry.data),
            _ => None,
        }
    }
}

/// Internal statistics tracking
#[derive(Debug, Default)]
struct MemoryStats {
    hits: u64,
    misses: u64,
    expired: u64,
}

/// In-memory cache store
///
/// Entries are kept least-recently-used first. Reads of fresh entries and
/// writes move the entry to the most-recently-used end; capacity eviction
/// pops from the other end. Cloning creates a new handle to the SAME store.
#[derive(Clone)]
pub struct MemoryStore {
    /// Main data store, recency ordered
    entries: Arc<Mutex<LruCache<String, CacheEntry>>>,
    /// Statistics
    stats: Arc<RwLock<MemoryStats>>,
    /// Configuration
    config: MemoryConfig,
}

impl MemoryStore {
    /// Create a new memory store
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            entries: Arc::new(Mutex::new(LruCache::unbounded())),
            stats: Arc::new(RwLock::new(MemoryStats::default())),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(MemoryConfig::default())
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Look up `key` at `now_ms`, counting a hit or a miss
    pub fn get(&self, key: &str, now_ms: u64) -> Lookup {
        let mut entries = self.entries.lock();

        let expired = match entries.peek(key) {
            None => {
                self.stats.write().misses += 1;
                return Lookup::Miss;
            }
            Some(entry) => entry.is_expired_at(now_ms),
        };

        if expired {
            entries.pop(key);
            self.stats.write().misses += 1;
            return Lookup::Expired;
        }

        // `get` promotes to most recently used
        match entries.get(key) {
            Some(entry) => {
                self.stats.write().hits += 1;
                Lookup::Hit(entry.clone())
            }
            None => {
                self.stats.write().misses += 1;
                Lookup::Miss
            }
        }
    }

    /// Insert or overwrite `key`, then trim to capacity
    ///
    /// Returns the keys evicted to make room, oldest first.
    pub fn insert(&self, key: String, entry: CacheEntry) -> Vec<String> {
        let mut entries = self.entries.lock();
        entries.put(key, entry);
        self.evict_over_capacity(&mut entries)
    }

    fn evict_over_capacity(&self, entries: &mut LruCache<String, CacheEntry>) -> Vec<String> {
        if self.config.max_capacity == 0 {
            return Vec::new(); // Unlimited
        }

        let mut evicted = Vec::new();
        while entries.len() > self.config.max_capacity {
            match entries.pop_lru() {
                Some((key, _)) => evicted.push(key),
                None => break,
            }
        }
        evicted
    }

    /// Remove one entry; true if it existed
    pub fn remove(&self, key: &str) -> bool {
        self.entries.lock().pop(key).is_some()
    }

    /// Remove every entry whose key contains `fragment`
    pub fn remove_matching(&self, fragment: &str) -> usize {
        let mut entries = self.entries.lock();
        let keys: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.contains(fragment))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys {
            entries.pop(key.as_str());
        }
        keys.len()
    }

    /// Sweep expired entries and return how many were removed
    pub fn purge_expired(&self, now_ms: u64) -> usize {
        let mut entries = self.entries.lock();
        let keys: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys {
            entries.pop(key.as_str());
        }

        if !keys.is_empty() {
            self.stats.write().expired += keys.len() as u64;
        }
        keys.len()
    }

    /// Remove all entries; counters are kept
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Copy of every entry, least recently used first
    pub fn snapshot(&self) -> Vec<(String, CacheEntry)> {
        self.entries
            .lock()
            .iter()
            .rev()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }

    /// Admit entries in the given order, skipping those already expired at `now_ms`
    ///
    /// Skipped entries do not touch any counter. Returns the number admitted.
    pub fn restore<I>(&self, items: I, now_ms: u64) -> usize
    where
        I: IntoIterator<Item = (String, CacheEntry)>,
    {
        let mut entries = self.entries.lock();
        let mut admitted = 0;
        for (key, entry) in items {
            if entry.is_expired_at(now_ms) {
                continue;
            }
            entries.put(key, entry);
            admitted += 1;
        }
        self.evict_over_capacity(&mut entries);
        admitted
    }

    /// Keys from least to most recently used
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .rev()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Physically present, possibly stale; does not touch recency or counters
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains(key)
    }

    /// Counters plus current size
    pub fn stats(&self) -> CacheStats {
        let size = self.len();
        let stats = self.stats.read();
        CacheStats::new(stats.hits, stats.misses, stats.expired, size)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
