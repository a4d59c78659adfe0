//! integracity-cache-storage: Storage for the IntegraCity API cache
//!
//! - [`MemoryStore`]: recency-ordered in-memory entries with LRU eviction
//! - [`MemoryDurableStore`] / [`FileDurableStore`]: durable slots for snapshots
//! - [`snapshot`]: the persisted snapshot format

pub mod durable;
#[cfg(feature = "memory")]
pub mod memory;
pub mod snapshot;

#[cfg(feature = "file")]
pub use durable::FileDurableStore;
#[cfg(feature = "memory")]
pub use durable::MemoryDurableStore;
#[cfg(feature = "memory")]
pub use memory::{Lookup, MemoryConfig, MemoryStore};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot, SnapshotEntry};
