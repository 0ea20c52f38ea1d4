//! Key-value blob persistence.
//!
//! Each key holds one serialized JSON document. Writes replace the whole
//! document; there are no partial updates and no version checks, so two
//! processes writing the same key race and the last writer wins.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::StoreError;

/// Fixed storage keys.
pub mod keys {
    /// Serialized array of projects, most recent first.
    pub const PROJECTS: &str = "founder_validator_projects";
    /// Serialized session user, absent when signed out.
    pub const CURRENT_USER: &str = "fv_current_user";
    /// Serialized array of credential records.
    pub const USERS: &str = "fv_users";
}

/// A string-valued key-value store.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and deserialize the document under `key`.
///
/// A missing key is `Ok(None)`; a document that does not parse is an error
/// the caller decides how to handle.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn BlobStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` and replace the document under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn BlobStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

// ── File-backed ──

/// One `<key>.json` file per key inside a data directory.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so a crash mid-write leaves the previous document intact.
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open (creating if needed) a blob directory.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(value.as_bytes()).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        debug!(key, bytes = value.len(), "blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

// ── In-memory ──

/// Ephemeral store for tests and dry runs.
#[derive(Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Other(format!("blob store lock poisoned: {e}")))
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_set_get_remove() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = FileBlobStore::open(tmp.path()).unwrap();

        assert_eq!(store.get("alpha").unwrap(), None);
        store.set("alpha", "[1,2,3]").unwrap();
        assert_eq!(store.get("alpha").unwrap().as_deref(), Some("[1,2,3]"));
        assert!(tmp.path().join("alpha.json").exists());

        store.set("alpha", "[]").unwrap();
        assert_eq!(store.get("alpha").unwrap().as_deref(), Some("[]"));

        store.remove("alpha").unwrap();
        assert_eq!(store.get("alpha").unwrap(), None);
        // Removing again is fine.
        store.remove("alpha").unwrap();
    }

    #[test]
    fn file_store_creates_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        let store = FileBlobStore::open(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let tmp = tempfile::TempDir::new().unwrap();
        let store = FileBlobStore::open(tmp.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn file_store_survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        {
            let store = FileBlobStore::open(tmp.path()).unwrap();
            store.set(keys::USERS, "[]").unwrap();
        }
        let store = FileBlobStore::open(tmp.path()).unwrap();
        assert_eq!(store.get(keys::USERS).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryBlobStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn json_helpers() {
        let store = MemoryBlobStore::new();
        assert_eq!(load_json::<Vec<u32>>(&store, "nums").unwrap(), None);

        save_json(&store, "nums", &vec![3u32, 1, 2]).unwrap();
        assert_eq!(
            load_json::<Vec<u32>>(&store, "nums").unwrap(),
            Some(vec![3, 1, 2])
        );

        store.set("nums", "{not json").unwrap();
        assert!(matches!(
            load_json::<Vec<u32>>(&store, "nums"),
            Err(StoreError::Json(_))
        ));
    }
}
