//! Key-value store trait abstraction.
//!
//! Preferences such as the per-conversation operational mode live behind this
//! trait so the production file store and in-memory test stores are
//! interchangeable.

/// Key-value store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying file or device error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Store cannot be used right now (poisoned lock, quota, mock failure)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Trait for string key-value storage.
///
/// Writes are last-write-wins per key. Implementations must be usable from
/// any thread.
///
/// # Example
///
/// ```ignore
/// use converse::traits::KeyValueStore;
///
/// fn remember<S: KeyValueStore>(store: &S) -> Result<(), StoreError> {
///     store.set("conversation_mode_c1", "fast")?;
///     assert_eq!(store.get("conversation_mode_c1")?.as_deref(), Some("fast"));
///     Ok(())
/// }
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if it does not
    /// - `Err(error)` if the store could not be read
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
