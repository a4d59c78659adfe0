//! File-backed durable store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use integracity_cache_core::{CacheError, DurableStore, Result};

/// One file per slot under a directory
///
/// Writes go to a temporary sibling and are renamed into place, so a reader
/// never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileDurableStore {
    root: PathBuf,
}

impl FileDurableStore {
    /// Open (and create if needed) the directory holding the slots
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(CacheError::Storage(format!("invalid slot name: {key:?}")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl DurableStore for FileDurableStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDurableStore::open(dir.path().join("cache")).unwrap();

        assert_eq!(store.get_item("integracity_api_cache").unwrap(), None);
        store.set_item("integracity_api_cache", "{\"v\":1}").unwrap();
        assert!(store.root().join("integracity_api_cache.json").exists());

        // a second handle on the same directory sees the slot
        let reopened = FileDurableStore::open(store.root()).unwrap();
        assert_eq!(
            reopened.get_item("integracity_api_cache").unwrap().as_deref(),
            Some("{\"v\":1}")
        );

        reopened.remove_item("integracity_api_cache").unwrap();
        reopened.remove_item("integracity_api_cache").unwrap();
        assert_eq!(store.get_item("integracity_api_cache").unwrap(), None);
    }

    #[test]
    fn test_rejects_path_like_slot_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDurableStore::open(dir.path()).unwrap();
        for bad in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(store.set_item(bad, "x"), Err(CacheError::Storage(_))));
        }
    }
}
