//! Storage
//!
//! A small string key-value abstraction standing in for browser local storage. Values
//! are opaque strings; callers own the serialization format.

use std::rc::Rc;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying I/O failure.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The write would exceed the store's quota.
    #[error("storage quota exceeded writing {key}: {required} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Bytes the store would hold after the write
        required: usize,
        /// Store quota in bytes
        quota: usize,
    },

    /// The key cannot be used with this store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Failure to save a JSON value into a [`KeyValueStore`].
///
/// Stores that return this from a mutation have already applied the change in memory;
/// treat it as a warning for the customer, not a failed operation.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The value could not be serialized.
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The serialized value could not be written.
    #[error("failed to save value: {0}")]
    Storage(#[from] StorageError),
}

/// String key-value store.
///
/// Methods take `&self`; implementations that mutate in memory use interior mutability,
/// matching the single-threaded, shared-handle nature of browser storage.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value could not be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store could not be updated.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Serialize `value` as JSON and write it under `key`, logging failures.
pub(crate) fn save_json<S, T>(storage: &S, key: &str, value: &T) -> Result<(), PersistError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(PersistError::from)
        .and_then(|json| storage.set(key, &json).map_err(PersistError::from));

    if let Err(err) = &result {
        warn!(key, error = %err, "changes were not saved");
    }

    result
}

/// Read and deserialize the JSON value under `key`.
///
/// Missing keys, read failures and corrupt data all yield `None`; the latter two are
/// logged.
pub(crate) fn load_json<S, T>(storage: &S, key: &str) -> Option<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match storage.get(key) {
        Ok(raw) => raw?,
        Err(err) => {
            warn!(key, error = %err, "failed to read saved value");

            return None;
        }
    };

    serde_json::from_str(&raw)
        .inspect_err(|err| warn!(key, error = %err, "saved value is corrupt; ignoring it"))
        .ok()
}
