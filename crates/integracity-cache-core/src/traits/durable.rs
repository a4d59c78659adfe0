//! Durable key-value storage capability

use crate::Result;

/// String key-value slots that outlive the in-memory store
///
/// Mirrors a browser's page storage: each slot holds one string. Reads of a
/// slot that was never written return `Ok(None)`.
pub trait DurableStore: Send + Sync + 'static {
    /// Read a slot
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a slot, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot; removing a missing slot is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<S: DurableStore + ?Sized> DurableStore for std::sync::Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}
