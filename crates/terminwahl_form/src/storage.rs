// --- File: crates/terminwahl_form/src/storage.rs ---
//! Session and local key-value storage.
//!
//! `MemoryStore` lives as long as the session, `FileStore` persists to a JSON
//! file. `BrowserStorage` bundles one of each behind the helpers the page
//! scripts use; those helpers log storage failures instead of returning them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Session scoped storage, gone when the process ends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.values.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.values.write().map_err(|_| StorageError::LockPoisoned)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.values.write().map_err(|_| StorageError::LockPoisoned)?;
        guard.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.values.write().map_err(|_| StorageError::LockPoisoned)?;
        guard.clear();
        Ok(())
    }
}

/// Durable storage: an in-memory cache written through to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file starts empty; an unreadable
    /// or corrupt one is logged and replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cache = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(data) => match serde_json::from_str::<HashMap<String, String>>(&data) {
                    Ok(map) => map,
                    Err(e) => {
                        warn!("Failed to parse storage file {:?}: {}", path, e);
                        HashMap::new()
                    }
                },
                Err(e) => {
                    warn!("Failed to read storage file {:?}: {}", path, e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        debug!("File storage opened at {:?} with {} entries", path, cache.len());
        Self {
            path,
            cache: RwLock::new(cache),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `values` to a sibling temp file and renames it over the store,
    /// so readers never see a partial file.
    fn persist(&self, values: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Applies `f` and persists while holding the write lock. On a failed
    /// write the cache is rolled back to match the file.
    fn update(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), StorageError> {
        let mut guard = self.cache.write().map_err(|_| StorageError::LockPoisoned)?;
        let previous = guard.clone();
        f(&mut guard);
        if let Err(e) = self.persist(&guard) {
            *guard = previous;
            return Err(e);
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.cache.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|values| {
            values.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.update(HashMap::clear)
    }
}

/// The page's two storage areas.
#[derive(Clone)]
pub struct BrowserStorage {
    session: Arc<dyn KeyValueStore>,
    local: Arc<dyn KeyValueStore>,
}

impl BrowserStorage {
    pub fn new(session: Arc<dyn KeyValueStore>, local: Arc<dyn KeyValueStore>) -> Self {
        Self { session, local }
    }

    /// Both areas in memory. Used by tests and hosts without a data directory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Memory-backed session storage, local storage persisted at `path`.
    pub fn with_local_file(path: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(FileStore::open(path)))
    }

    pub fn save_to_session_storage(&self, key: &str, value: Option<&str>) {
        save(self.session.as_ref(), "session", key, value);
    }

    pub fn save_to_local_storage(&self, key: &str, value: Option<&str>) {
        save(self.local.as_ref(), "local", key, value);
    }

    pub fn get_from_session_storage(&self, key: &str) -> Option<String> {
        match self.session.get(key) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to read session storage key {}: {}", key, e);
                None
            }
        }
    }

    /// Empty string when the key is absent.
    pub fn get_from_local_storage(&self, key: &str) -> String {
        match self.local.get(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                error!("Failed to read local storage key {}: {}", key, e);
                String::new()
            }
        }
    }

    pub fn delete_from_session_storage(&self, key: &str) {
        if let Err(e) = self.session.remove(key) {
            error!("Failed to delete session storage key {}: {}", key, e);
        }
    }

    pub fn delete_from_local_storage(&self, key: &str) {
        if let Err(e) = self.local.remove(key) {
            error!("Failed to delete local storage key {}: {}", key, e);
        }
    }

    pub fn clear_session_storage(&self) {
        if let Err(e) = self.session.clear() {
            error!("Failed to clear session storage: {}", e);
        }
    }

    pub fn clear_local_storage(&self) {
        if let Err(e) = self.local.clear() {
            error!("Failed to clear local storage: {}", e);
        }
    }

    pub fn clear_all_storage(&self) {
        self.clear_session_storage();
        self.clear_local_storage();
    }
}

impl std::fmt::Debug for BrowserStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserStorage").finish_non_exhaustive()
    }
}

// `None` values are skipped; key and value are trimmed.
fn save(store: &dyn KeyValueStore, area: &str, key: &str, value: Option<&str>) {
    let Some(value) = value else {
        debug!("Skipping {} storage write of {} without value", area, key);
        return;
    };
    if let Err(e) = store.set(key.trim(), value.trim()) {
        error!("Failed to write {} storage key {}: {}", area, key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_trims_and_skips_none() {
        let storage = BrowserStorage::in_memory();
        storage.save_to_session_storage("  termin ", Some(" 09:00 "));
        storage.save_to_session_storage("leer", None);

        assert_eq!(
            storage.get_from_session_storage("termin").as_deref(),
            Some("09:00")
        );
        assert_eq!(storage.get_from_session_storage("leer"), None);
    }

    #[test]
    fn test_local_getter_defaults_to_empty() {
        let storage = BrowserStorage::in_memory();
        assert_eq!(storage.get_from_local_storage("missing"), "");
        storage.save_to_local_storage("sprache", Some("de"));
        assert_eq!(storage.get_from_local_storage("sprache"), "de");
    }

    #[test]
    fn test_delete_and_clear() {
        let storage = BrowserStorage::in_memory();
        storage.save_to_session_storage("a", Some("1"));
        storage.save_to_session_storage("b", Some("2"));
        storage.save_to_local_storage("c", Some("3"));

        storage.delete_from_session_storage("a");
        assert_eq!(storage.get_from_session_storage("a"), None);
        assert_eq!(storage.get_from_session_storage("b").as_deref(), Some("2"));

        storage.clear_session_storage();
        assert_eq!(storage.get_from_session_storage("b"), None);
        assert_eq!(storage.get_from_local_storage("c"), "3");

        storage.clear_all_storage();
        assert_eq!(storage.get_from_local_storage("c"), "");
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("local.json");

        let store = FileStore::open(&path);
        store.set("email", "a@b.de").unwrap();
        store.set("gone", "x").unwrap();
        store.remove("gone").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("email").unwrap().as_deref(), Some("a@b.de"));
        assert_eq!(reopened.get("gone").unwrap(), None);
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("local.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("x").unwrap(), None);
        store.set("x", "1").unwrap();
        assert_eq!(FileStore::open(&path).get("x").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_file_store_concurrent_writers_keep_every_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("local.json");
        let store = Arc::new(FileStore::open(&path));

        let writers: Vec<_> = (0..8)
            .map(|writer| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for n in 0..20 {
                        store.set(&format!("k{writer}-{n}"), "v").unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let reopened = FileStore::open(&path);
        for writer in 0..8 {
            for n in 0..20 {
                assert_eq!(
                    reopened.get(&format!("k{writer}-{n}")).unwrap().as_deref(),
                    Some("v")
                );
            }
        }
    }

    #[test]
    fn test_file_store_rolls_back_failed_write() {
        let dir = tempdir().unwrap();
        // A directory at the store path makes the rename fail
        let path = dir.path().join("blocked");
        fs::create_dir(&path).unwrap();

        let store = FileStore::open(&path);
        assert!(store.set("email", "a@b.de").is_err());
        assert_eq!(store.get("email").unwrap(), None);
    }
}
