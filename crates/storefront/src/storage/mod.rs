//! Local key-value persistence for cart and session data.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] is the backend seam: string keys, string values,
//!   synchronous get/set/remove (the same contract as browser local storage)
//! - [`MemoryStore`] keeps everything in process (tests, throwaway sessions)
//! - [`FileStore`] keeps one file per key under a data directory
//! - [`Persistence`] wraps a backend with JSON helpers and is what the rest
//!   of the crate holds
//!
//! Writes are synchronous so that a mutation and its persisted snapshot are
//! never observed out of step.

mod file;
mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage keys used by the shop.
pub mod keys {
    /// JSON array of cart lines.
    pub const CART: &str = "cart";

    /// JSON object describing the logged-in user.
    pub const USER: &str = "user";

    /// Bearer token issued by the auth backend (raw string, not JSON).
    pub const TOKEN: &str = "token";
}

/// Errors from a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be encoded as JSON.
    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A string-keyed, string-valued local store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to a [`KeyValueStore`] with JSON helpers.
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Wrap a backend.
    #[must_use]
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A fresh in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read a raw string value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.get(key)
    }

    /// Write a raw string value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.set(key, value)
    }

    /// Read and decode a JSON value.
    ///
    /// A value that does not decode is treated as absent; it is logged and
    /// left in place for the next successful write to replace.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.backend.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring undecodable stored value");
                Ok(None)
            }
        }
    }

    /// Encode `value` as JSON and store it.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the backend cannot be written.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw)
    }

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key)
    }
}
