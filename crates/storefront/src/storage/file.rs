//! # Filesystem-backed key-value store
//!
//! [`FileStore`] persists each key as its own file so that cart and session
//! survive between `mshop` invocations.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── cart      # JSON array of cart lines
//! ├── user      # JSON object
//! └── token     # raw bearer token
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{KeyValueStore, StorageError};

/// Filesystem-backed `KeyValueStore`.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base`. The directory is created on first write.
    #[must_use]
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Path of the file backing `key`.
    fn entry_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.entry_path(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key)?;
        fs::create_dir_all(&self.base)?;

        // Write-then-rename so a crash never leaves a half-written cart.
        let tmp = self.base.join(format!(".{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.entry_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "mobile_shop_file_store_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let store = FileStore::new(dir.clone());

        assert!(store.get("cart").unwrap().is_none());
        store.set("cart", r#"[{"id":1}]"#).unwrap();

        // Re-open from the same directory
        let reopened = FileStore::new(dir.clone());
        assert_eq!(
            reopened.get("cart").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );

        reopened.remove("cart").unwrap();
        assert!(store.get("cart").unwrap().is_none());
        // Second remove is a no-op
        reopened.remove("cart").unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let store = FileStore::new(scratch_dir("keys"));
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }
}
