//! Capability traits injected into the cache

mod clock;
mod durable;
mod fetcher;
mod serializer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use durable::DurableStore;
pub use fetcher::{FetchResponse, Fetcher};
pub use serializer::{JsonSerializer, Serializer};
