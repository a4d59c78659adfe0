//! Durable key-value stores for cache snapshots

#[cfg(feature = "file")]
mod file;
#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "file")]
pub use file::FileDurableStore;
#[cfg(feature = "memory")]
pub use memory::MemoryDurableStore;
