//! High-level API cache

use futures_util::future::join_all;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::warn;

use integracity_cache_core::{
    CacheEntry, CacheError, CacheStats, Clock, DurableStore, FetchOptions, FetchOutcome,
    Fetcher, JsonSerializer, RequestKey, Result, SystemClock,
};
use integracity_cache_storage::{Lookup, MemoryConfig, MemoryDurableStore, MemoryStore, Snapshot};

use crate::ApiCacheConfig;

mod coalescer;
use coalescer::Coalescer;

mod sweeper;

/// Per-operation event, emitted only while debug logging is on
macro_rules! cache_event {
    ($inner:expr, $($arg:tt)+) => {
        if $inner.debug.load(Ordering::Relaxed) {
            tracing::debug!(target: "integracity_cache", $($arg)+);
        }
    };
}

pub(crate) struct Inner {
    store: MemoryStore,
    config: ApiCacheConfig,
    clock: Arc<dyn Clock>,
    durable: Arc<dyn DurableStore>,
    fetcher: Arc<dyn Fetcher>,
    serializer: JsonSerializer,
    debug: AtomicBool,
    /// Snapshot is admitted once, on the first start or write
    restored: AtomicBool,
    /// Orders snapshot writes with `clear`
    persist_lock: Mutex<()>,
    coalescer: Coalescer,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.abort();
        }
    }
}

/// API response cache with endpoint TTLs, LRU eviction, expiry sweeping
/// and optional durable snapshots
///
/// Cloning creates a new handle to the SAME cache.
///
/// ```rust,no_run
/// use integracity_cache::prelude::*;
///
/// # async fn run() -> Result<()> {
/// let cache = ApiCache::new(ApiCacheConfig::with_base_url("https://siscor.example.rio/"))?;
/// cache.start()?;
///
/// let sirenes = cache
///     .cached_fetch(RequestKey::new("/api/sirenes/"), FetchOptions::new())
///     .await?;
/// println!("from cache: {}", sirenes.from_cache);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiCache {
    inner: Arc<Inner>,
}

/// Builder wiring the injected capabilities into an [`ApiCache`]
pub struct ApiCacheBuilder {
    config: ApiCacheConfig,
    clock: Option<Arc<dyn Clock>>,
    durable: Option<Arc<dyn DurableStore>>,
    fetcher: Option<Arc<dyn Fetcher>>,
}

impl ApiCacheBuilder {
    /// Wall clock used for entry timestamps (default: system time)
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Durable slots for snapshots (default: process memory)
    pub fn durable_store(mut self, store: impl DurableStore) -> Self {
        self.durable = Some(Arc::new(store));
        self
    }

    /// Network capability (default: `reqwest` against `config.base_url`)
    pub fn fetcher(mut self, fetcher: impl Fetcher) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn build(self) -> Result<ApiCache> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => default_fetcher(&self.config)?,
        };
        let store = MemoryStore::new(MemoryConfig::with_capacity(self.config.max_cache_size));

        Ok(ApiCache {
            inner: Arc::new(Inner {
                store,
                clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
                durable: self
                    .durable
                    .unwrap_or_else(|| Arc::new(MemoryDurableStore::new())),
                fetcher,
                serializer: JsonSerializer,
                debug: AtomicBool::new(self.config.debug),
                restored: AtomicBool::new(false),
                persist_lock: Mutex::new(()),
                coalescer: Coalescer::new(),
                sweeper: Mutex::new(None),
                config: self.config,
            }),
        })
    }
}

#[cfg(feature = "http")]
fn default_fetcher(config: &ApiCacheConfig) -> Result<Arc<dyn Fetcher>> {
    let fetcher = integracity_cache_http::ReqwestFetcher::new(&config.base_url)?;
    Ok(Arc::new(fetcher))
}

#[cfg(not(feature = "http"))]
fn default_fetcher(_config: &ApiCacheConfig) -> Result<Arc<dyn Fetcher>> {
    Err(CacheError::Internal(
        "no fetcher configured and the `http` feature is disabled".to_string(),
    ))
}

impl ApiCache {
    /// Start building a cache from `config`
    pub fn builder(config: ApiCacheConfig) -> ApiCacheBuilder {
        ApiCacheBuilder {
            config,
            clock: None,
            durable: None,
            fetcher: None,
        }
    }

    /// Create a cache with default capabilities
    pub fn new(config: ApiCacheConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub(crate) fn from_inner(inner: Arc<Inner>) -> Self {
        Self { inner }
    }

    pub fn config(&self) -> &ApiCacheConfig {
        &self.inner.config
    }

    fn now(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    /// Restore the durable snapshot (if no write did already) and start the
    /// expiry sweeper
    ///
    /// Must run inside a Tokio runtime. Calling it again while the sweeper
    /// runs does nothing.
    pub fn start(&self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| CacheError::Internal("start() requires a Tokio runtime".to_string()))?;

        let mut slot = self.inner.sweeper.lock();
        if slot.is_some() {
            return Ok(());
        }

        self.ensure_restored();

        let period = self.inner.config.sweep_interval;
        if period.is_zero() {
            cache_event!(self.inner, "Expiry sweeper disabled");
        } else {
            *slot = Some(sweeper::spawn(&runtime, Arc::downgrade(&self.inner), period));
        }
        cache_event!(self.inner, event = "start", "Cache started");
        Ok(())
    }

    /// Stop the expiry sweeper; entries stay in place
    pub fn stop(&self) {
        if let Some(handle) = self.inner.sweeper.lock().take() {
            handle.abort();
            cache_event!(self.inner, event = "stop", "Cache stopped");
        }
    }

    /// True while the expiry sweeper is scheduled
    pub fn is_running(&self) -> bool {
        self.inner.sweeper.lock().is_some()
    }

    /// Toggle per-operation debug logging
    pub fn set_debug(&self, enabled: bool) {
        self.inner.debug.store(enabled, Ordering::Relaxed);
    }

    pub fn is_debug(&self) -> bool {
        self.inner.debug.load(Ordering::Relaxed)
    }

    /// Fresh cached payload for `key`, if any
    pub fn get(&self, key: impl Into<RequestKey>) -> Option<Value> {
        let key = key.into().cache_key();
        match self.inner.store.get(&key, self.now()) {
            Lookup::Hit(entry) => {
                cache_event!(self.inner, event = "hit", key = %key, "Cache Hit");
                Some(entry.data)
            }
            Lookup::Expired => {
                cache_event!(self.inner, event = "expired", key = %key, "Cache Expired");
                None
            }
            Lookup::Miss => {
                cache_event!(self.inner, event = "miss", key = %key, "Cache Miss");
                None
            }
        }
    }

    /// [`get`](Self::get) deserialized into `T`
    pub fn get_as<T: DeserializeOwned>(&self, key: impl Into<RequestKey>) -> Result<Option<T>> {
        self.get(key)
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| CacheError::Deserialization(e.to_string()))
    }

    /// TTL a write to `path` gets without an explicit TTL
    pub fn resolve_ttl(&self, path: &str) -> Duration {
        self.inner.config.ttl_for(path)
    }

    /// Store `value` for `key`
    ///
    /// TTL is `ttl` when given and non-zero, else the endpoint table, else
    /// the default. A failed snapshot write is logged; the in-memory write
    /// stands.
    pub fn set(&self, key: impl Into<RequestKey>, value: Value, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl
            .filter(|ttl| !ttl.is_zero())
            .unwrap_or_else(|| self.resolve_ttl(key.path()));
        self.ensure_restored();
        let cache_key = key.cache_key();

        let entry = CacheEntry::new(value, self.now(), ttl);
        let evicted = self.inner.store.insert(cache_key.clone(), entry);

        cache_event!(self.inner, event = "set", key = %cache_key, ttl_ms = ttl.as_millis() as u64, "Cache Set");
        if !evicted.is_empty() {
            cache_event!(self.inner, event = "eviction", reason = "capacity", count = evicted.len(), "Cache Eviction");
        }

        self.persist_best_effort();
    }

    /// Remove every entry whose key contains `fragment`
    pub fn invalidate(&self, fragment: &str) -> usize {
        self.ensure_restored();
        let removed = self.inner.store.remove_matching(fragment);
        cache_event!(self.inner, event = "invalidate", fragment = %fragment, removed, "Cache Invalidate");
        // keep invalidated entries from coming back on the next restore
        if removed > 0 {
            self.persist_best_effort();
        }
        removed
    }

    /// Drop every entry and the durable snapshot; counters are kept
    pub fn clear(&self) {
        let _guard = self.inner.persist_lock.lock();
        self.inner.store.clear();
        if let Err(e) = self.inner.durable.remove_item(&self.inner.config.storage_key) {
            warn!(target: "integracity_cache", error = %e, "Failed to remove cache snapshot");
        }
        cache_event!(self.inner, event = "clear", "Cache Cleared");
    }

    /// Remove expired entries now; returns how many went
    pub fn purge_expired(&self) -> usize {
        let removed = self.inner.store.purge_expired(self.now());
        if removed > 0 {
            cache_event!(self.inner, event = "sweep", removed, "Cache Sweep");
        }
        removed
    }

    /// Counters plus current size
    pub fn stats(&self) -> CacheStats {
        self.inner.store.stats()
    }

    pub fn len(&self) -> usize {
        self.inner.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.is_empty()
    }

    /// Serve `key` from the cache, or GET it and cache the JSON body
    ///
    /// Network and JSON failures are returned as they are and nothing is
    /// cached for them.
    pub async fn cached_fetch(
        &self,
        key: impl Into<RequestKey>,
        options: FetchOptions,
    ) -> Result<FetchOutcome> {
        let key = key.into();

        if !options.bypass_cache {
            if let Some(data) = self.get(&key) {
                return Ok(FetchOutcome::cached(data));
            }
        }

        let data = if self.inner.config.coalesce_fetches && !options.bypass_cache {
            let cache_key = key.cache_key();
            self.inner
                .coalescer
                .do_request(&cache_key, || self.fetch_and_store(&key, options.ttl))
                .await?
        } else {
            self.fetch_and_store(&key, options.ttl).await?
        };

        Ok(FetchOutcome::fetched(data))
    }

    async fn fetch_and_store(&self, key: &RequestKey, ttl: Option<Duration>) -> Result<Value> {
        let start = Instant::now();
        let result = async {
            let response = self.inner.fetcher.fetch(key).await?.error_for_status()?;
            response.json()
        }
        .await;

        match result {
            Ok(data) => {
                cache_event!(self.inner, event = "fetch", key = %key, duration_ms = start.elapsed().as_millis() as u64, "Fetched");
                self.set(key, data.clone(), ttl);
                Ok(data)
            }
            Err(e) => {
                cache_event!(self.inner, event = "fetch_error", key = %key, error = %e, "Fetch failed");
                Err(e)
            }
        }
    }

    /// Warm the cache for every key concurrently
    ///
    /// Individual failures are logged and ignored.
    pub async fn prefetch<I, K>(&self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<RequestKey>,
    {
        let keys: Vec<RequestKey> = keys.into_iter().map(Into::into).collect();
        cache_event!(self.inner, event = "prefetch", count = keys.len(), "Prefetching");

        let fetches = keys.iter().map(|key| async move {
            if let Err(e) = self.cached_fetch(key, FetchOptions::default()).await {
                warn!(target: "integracity_cache", key = %key, error = %e, "Prefetch failed");
            }
        });
        join_all(fetches).await;
    }

    /// [`prefetch`](Self::prefetch) on a background task
    ///
    /// Must run inside a Tokio runtime.
    pub fn spawn_prefetch<I, K>(&self, keys: I) -> Result<JoinHandle<()>>
    where
        I: IntoIterator<Item = K>,
        K: Into<RequestKey>,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            CacheError::Internal("spawn_prefetch() requires a Tokio runtime".to_string())
        })?;
        let keys: Vec<RequestKey> = keys.into_iter().map(Into::into).collect();
        let cache = self.clone();
        Ok(runtime.spawn(async move { cache.prefetch(keys).await }))
    }

    /// Admit the durable snapshot once, before the first start or write
    ///
    /// Writing before this would replace the snapshot with the partial
    /// in-memory state.
    fn ensure_restored(&self) {
        if !self.inner.config.enable_persistence || self.inner.restored.load(Ordering::SeqCst) {
            return;
        }
        let _guard = self.inner.persist_lock.lock();
        if self.inner.restored.swap(true, Ordering::SeqCst) {
            return;
        }
        match self.restore() {
            Ok(admitted) => {
                cache_event!(self.inner, event = "restore", admitted, "Restored cache snapshot");
            }
            Err(e) => {
                warn!(target: "integracity_cache", error = %e, "Failed to restore cache snapshot");
            }
        }
    }

    fn persist_best_effort(&self) {
        if !self.inner.config.enable_persistence {
            return;
        }
        if let Err(e) = self.persist() {
            warn!(target: "integracity_cache", error = %e, "Failed to persist cache snapshot");
        }
    }

    fn persist(&self) -> Result<()> {
        let _guard = self.inner.persist_lock.lock();
        let snapshot = Snapshot::from_entries(self.inner.store.snapshot());
        let text = snapshot.encode(&self.inner.serializer)?;
        self.inner
            .durable
            .set_item(&self.inner.config.storage_key, &text)
    }

    fn restore(&self) -> Result<usize> {
        let Some(text) = self.inner.durable.get_item(&self.inner.config.storage_key)? else {
            return Ok(0);
        };
        let snapshot = Snapshot::decode(&self.inner.serializer, &text)?;
        Ok(self.inner.store.restore(snapshot.into_entries(), self.now()))
    }
}
