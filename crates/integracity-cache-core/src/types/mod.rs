//! Core types for cache operations

mod entry;
mod fetch;
mod key;
mod stats;
mod ttl_policy;

pub use entry::CacheEntry;
pub use fetch::{FetchOptions, FetchOutcome};
pub use key::RequestKey;
pub use stats::CacheStats;
pub use ttl_policy::{EndpointTtl, TtlPolicy};
