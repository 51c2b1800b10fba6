//! File-backed flag storage
//!
//! All flags live in a single JSON object. Every mutation rewrites the file
//! through a sibling temp file and a rename, so a crash mid-write leaves
//! either the old or the new contents on disk.

use kuusi_core::effects::FlagStorageEffects;
use kuusi_core::StorageError;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Flag storage persisted to a JSON file.
#[derive(Debug)]
pub struct FileFlagStorage {
    path: PathBuf,
    data: Mutex<BTreeMap<String, String>>,
}

impl FileFlagStorage {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is reported as [`StorageError::Corrupt`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let data = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StorageError::Corrupt(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        tracing::debug!(path = %path.display(), entries = data.len(), "Opened flag storage");
        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::WriteFailed(format!("Failed to create directory: {e}"))
                })?;
            }
        }

        let encoded = serde_json::to_vec_pretty(data)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to encode flags: {e}")))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, encoded)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to write file: {e}")))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StorageError::WriteFailed(format!("Failed to replace file: {e}")))
    }

    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> R,
    ) -> Result<R, StorageError> {
        let mut data = self.data.lock();
        let mut next = data.clone();
        let result = f(&mut next);
        if next != *data {
            self.persist(&next)?;
            *data = next;
        }
        Ok(result)
    }
}

fn check_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey {
            reason: "Key cannot be empty".to_string(),
        });
    }
    Ok(())
}

impl FlagStorageEffects for FileFlagStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.mutate(|data| {
            data.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.mutate(|data| data.remove(key).is_some())
    }

    fn take(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.mutate(|data| data.remove(key))
    }

    fn set_if_absent(&self, key: &str, value: &str) -> Result<Option<String>, StorageError> {
        check_key(key)?;
        self.mutate(|data| {
            if let Some(existing) = data.get(key) {
                return Some(existing.clone());
            }
            data.insert(key.to_string(), value.to_string());
            None
        })
    }
}
