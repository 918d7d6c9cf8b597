//! In-memory key-value store for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{KeyValueStore, StoreError};

/// In-memory key-value store.
///
/// Clones share state, so a test can keep a handle for inspection while the
/// code under test owns another.
///
/// # Example
///
/// ```ignore
/// use converse::adapters::mock::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.set_get_should_fail(true);
/// assert!(store.get("k").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    /// Number of successful writes
    writes: Arc<Mutex<usize>>,
    get_should_fail: Arc<Mutex<bool>>,
    set_should_fail: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.entries.lock().unwrap().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        store
    }

    /// Configure whether get should fail.
    pub fn set_get_should_fail(&self, should_fail: bool) {
        *self.get_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether set and remove should fail.
    pub fn set_set_should_fail(&self, should_fail: bool) {
        *self.set_should_fail.lock().unwrap() = should_fail;
    }

    /// Read a value without going through the failure switches.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Number of successful set calls so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if *self.get_should_fail.lock().unwrap() {
            return Err(StoreError::Unavailable("Mock get failure".to_string()));
        }

        Ok(self.peek(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if *self.set_should_fail.lock().unwrap() {
            return Err(StoreError::Unavailable("Mock set failure".to_string()));
        }

        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        if *self.set_should_fail.lock().unwrap() {
            return Err(StoreError::Unavailable("Mock remove failure".to_string()));
        }

        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
