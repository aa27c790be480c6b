//! Origin-scoped key-value storage
//!
//! The session clock lives in a small string-to-string store, the way a web
//! client keeps it in local storage. Values are not encrypted and not
//! namespaced per user; only a timestamp is ever written here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::{PrepperError, Result};

/// Store file name inside the data directory
const STORE_FILE_NAME: &str = "local_storage.json";

/// Data directory name
const STORE_DIR_NAME: &str = "ml-prepper";

/// Minimal string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store
///
/// Clones share the same map, which is how several controllers of one
/// origin (tabs) see each other's writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| PrepperError::Store("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON-file backed store
///
/// The whole map is re-read on every access so that other processes using
/// the same file are observed. Writes go to a temp file and are renamed into
/// place. Concurrent writers are last-write-wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    /// Default store location under the user data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STORE_DIR_NAME)
            .join(STORE_FILE_NAME)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        debug!("Stored {} in {:?}", key, self.path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
            debug!("Removed {} from {:?}", key, self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_operations() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "1").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1"));

        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let tab_a = MemoryStore::new();
        let tab_b = tab_a.clone();

        tab_a.set("session_start_time", "100").unwrap();
        assert_eq!(tab_b.get("session_start_time").unwrap().as_deref(), Some("100"));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");

        let store = FileStore::new(&path).unwrap();
        assert_eq!(store.get("theme").unwrap(), None);
        store.set("theme", "dark").unwrap();
        store.set("session_start_time", "1700000000000").unwrap();

        let reopened = FileStore::new(&path).unwrap();
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(
            reopened.get("session_start_time").unwrap().as_deref(),
            Some("1700000000000")
        );

        reopened.remove("session_start_time").unwrap();
        assert_eq!(store.get("session_start_time").unwrap(), None);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path).unwrap();
        assert!(matches!(store.get("k"), Err(PrepperError::Json(_))));
    }
}
