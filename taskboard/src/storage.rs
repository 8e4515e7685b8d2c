//! Key-value slot storage.
//!
//! The board persists into named string slots, the same shape as a browser's
//! per-origin local storage. [`FileStore`] keeps one JSON file per slot in a
//! data directory; [`MemoryStore`] keeps slots in process memory.

use crate::error::{BoardError, Result};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Durable string slots addressed by key
pub trait KeyValueStore: Send + Sync {
    /// Read a slot; `None` when it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a slot; missing slots are ignored
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

// =========================================================================
// File-backed slots
// =========================================================================

/// One `<key>.json` file per slot inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory. Nothing is created until
    /// the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the data directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to a slot's file
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Path to the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    /// Try to acquire an exclusive lock (non-blocking)
    pub fn lock(&self) -> Result<StoreLock> {
        fs::create_dir_all(&self.root)?;

        let file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.lock_path())?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StoreLock { file }),
            Err(_) => Err(BoardError::LockBusy),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| BoardError::storage(key, format!("read {}: {e}", path.display())))?;
        Ok(Some(content))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _lock = self.lock()?;
        let path = self.slot_path(key);
        atomic_write(&path, value.as_bytes())
            .map_err(|e| BoardError::storage(key, format!("write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _lock = self.lock()?;
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// RAII lock guard - releases on drop
pub struct StoreLock {
    file: fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Atomic write via temp file and rename
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path)?;

    Ok(())
}

// =========================================================================
// In-memory slots
// =========================================================================

/// Process-local slots. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, as a full or revoked storage would
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn slots(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| BoardError::storage("*", "memory store poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BoardError::storage(key, "quota exceeded"));
        }
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("board"));

        assert_eq!(store.root(), temp.path().join("board"));
        assert_eq!(
            store.slot_path("kanbanTasks"),
            temp.path().join("board").join("kanbanTasks.json")
        );
    }

    #[test]
    fn test_file_slot_io() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("board"));

        assert_eq!(store.get("darkMode").unwrap(), None);

        store.set("darkMode", "false").unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("false"));
        assert!(!store.slot_path("darkMode").with_extension("tmp").exists());

        store.set("darkMode", "true").unwrap();
        assert_eq!(store.get("darkMode").unwrap().as_deref(), Some("true"));

        store.remove("darkMode").unwrap();
        assert_eq!(store.get("darkMode").unwrap(), None);
        store.remove("darkMode").unwrap();
    }

    #[test]
    fn test_locking() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());

        let lock1 = store.lock().unwrap();

        let result = store.lock();
        assert!(matches!(result, Err(BoardError::LockBusy)));

        // Writes need the lock too
        assert!(matches!(store.set("k", "v"), Err(BoardError::LockBusy)));

        drop(lock1);
        store.set("k", "v").unwrap();
    }

    #[test]
    fn test_memory_clones_share_slots() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.set("kanbanTasks", "[]").unwrap();
        assert_eq!(handle.get("kanbanTasks").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_write_failure() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);

        let err = store.set("kanbanTasks", "[]").unwrap_err();
        assert!(matches!(err, BoardError::Storage { .. }));
        assert_eq!(store.get("kanbanTasks").unwrap(), None);
    }
}
