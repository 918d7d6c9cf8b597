//! File-based key-value store adapter.
//!
//! All keys live in one JSON object file, `preferences.json` inside the data
//! directory. The file is read on every lookup and rewritten on every change.
//! Writes go to a sibling temp file that is renamed over the original, so a
//! crash mid-write leaves the previous contents in place.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::traits::{KeyValueStore, StoreError};

/// File name of the preferences file inside the data directory
pub const PREFERENCES_FILE: &str = "preferences.json";

type Entries = BTreeMap<String, String>;

/// JSON-file key-value store.
///
/// # Example
///
/// ```ignore
/// use converse::adapters::FileStore;
/// use converse::traits::KeyValueStore;
///
/// let store = FileStore::new(config.data_dir());
/// store.set("user_mode_preference", "thinking")?;
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by `<data_dir>/preferences.json`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self::with_path(data_dir.as_ref().join(PREFERENCES_FILE))
    }

    /// Create a store backed by an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path to the preferences file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, StoreError> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn persist(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Entries) -> bool,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("preferences lock poisoned".to_string()))?;

        // A corrupt file is replaced on the next write instead of blocking
        // every later one
        let mut entries = match self.load() {
            Err(StoreError::Serialization(e)) if !e.is_io() => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt preferences file");
                Entries::new()
            }
            other => other?,
        };
        if apply(&mut entries) {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("nested").join("dir"));

        store.set("conversation_mode_c1", "fast").unwrap();

        assert!(store.path().exists());
        assert_eq!(
            store.get("conversation_mode_c1").unwrap().as_deref(),
            Some("fast")
        );
    }

    #[test]
    fn test_last_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("k", "fast").unwrap();
        store.set("k", "thinking").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("thinking"));
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();
        store.remove("missing").unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_fails_reads_until_rewritten() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        fs::write(store.path(), "{\"conversation_mode_c1\": \"fa").unwrap();

        assert!(matches!(
            store.get("conversation_mode_c1"),
            Err(StoreError::Serialization(_))
        ));

        store.set("conversation_mode_c2", "thinking").unwrap();
        assert_eq!(
            store.get("conversation_mode_c2").unwrap().as_deref(),
            Some("thinking")
        );
        assert_eq!(store.get("conversation_mode_c1").unwrap(), None);

        store.set("conversation_mode_c1", "fast").unwrap();
        assert_eq!(
            store.get("conversation_mode_c1").unwrap().as_deref(),
            Some("fast")
        );
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("k", "fast").unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(PREFERENCES_FILE)]);
    }

    #[test]
    fn test_two_handles_share_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let first = FileStore::new(temp_dir.path());
        let second = FileStore::new(temp_dir.path());

        first.set("k", "auto").unwrap();
        assert_eq!(second.get("k").unwrap().as_deref(), Some("auto"));
    }
}
