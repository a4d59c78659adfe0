//! In-memory cache store

mod store;

pub use store::{Lookup, MemoryConfig, MemoryStore};
