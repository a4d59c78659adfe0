//! integracity-cache-core: Core traits and types for the IntegraCity API cache
//!
//! This crate provides the foundational types and capability traits shared by
//! the storage, HTTP and cache-manager crates.

pub mod duration_ms;
mod error;
mod traits;
mod types;

pub use error::{CacheError, Result};
pub use traits::*;
pub use types::*;
