//! integracity-cache: API response cache for the IntegraCity operations dashboard
//!
//! # Features
//!
//! - **Per-endpoint TTLs** resolved from an ordered path-substring table
//! - **LRU eviction** bounded by entry count
//! - **Periodic expiry sweeping** on a Tokio timer
//! - **Durable snapshots** restored on start, failures logged and ignored
//! - **`cached_fetch`/`prefetch`** wrapping a pluggable [`Fetcher`]
//!
//! Clock, durable storage and network are injected through
//! [`ApiCache::builder`], so tests can drive time and storage by hand.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integracity_cache::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let cache = ApiCache::new(ApiCacheConfig::with_base_url("https://siscor.example.rio/"))?;
//!     cache.start()?;
//!
//!     cache.set("/api/sirenes/", json!([{"id": 1}]), None);
//!     assert!(cache.get("/api/sirenes/").is_some());
//!
//!     let cameras = cache
//!         .cached_fetch(RequestKey::new("/api/cameras/").param("bairro", "centro"), FetchOptions::new())
//!         .await?;
//!     println!("{} (from cache: {})", cameras.data, cameras.from_cache);
//!
//!     cache.stop();
//!     Ok(())
//! }
//! ```

mod config;
mod manager;

// Re-export core
pub use integracity_cache_core::*;

// Re-export storage
pub use integracity_cache_storage::{MemoryDurableStore, Snapshot};
#[cfg(feature = "file")]
pub use integracity_cache_storage::FileDurableStore;

#[cfg(feature = "http")]
pub use integracity_cache_http::ReqwestFetcher;

pub use config::{ApiCacheConfig, DEFAULT_STORAGE_KEY};
pub use manager::{ApiCache, ApiCacheBuilder};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ApiCache, ApiCacheBuilder, ApiCacheConfig, CacheError, CacheStats, Clock, DurableStore,
        FetchOptions, FetchOutcome, Fetcher, ManualClock, MemoryDurableStore, RequestKey, Result,
        SystemClock, TtlPolicy,
    };

    #[cfg(feature = "file")]
    pub use crate::FileDurableStore;

    #[cfg(feature = "http")]
    pub use crate::ReqwestFetcher;
}
