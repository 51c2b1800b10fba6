//! In-memory flag storage

use kuusi_core::effects::FlagStorageEffects;
use kuusi_core::StorageError;
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory flag storage. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryFlagStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryFlagStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-seeded with `entries`
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            data: Mutex::new(data),
        }
    }

    /// Copy of every stored entry
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.data.lock().clone()
    }
}

impl FlagStorageEffects for MemoryFlagStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }
        self.data.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.data.lock().remove(key).is_some())
    }

    fn take(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.lock().remove(key))
    }

    fn set_if_absent(&self, key: &str, value: &str) -> Result<Option<String>, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }
        let mut data = self.data.lock();
        if let Some(existing) = data.get(key) {
            return Ok(Some(existing.clone()));
        }
        data.insert(key.to_string(), value.to_string());
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_removes() {
        let storage = MemoryFlagStorage::with_entries([("k", "v")]);
        assert_eq!(storage.take("k").unwrap().as_deref(), Some("v"));
        assert_eq!(storage.take("k").unwrap(), None);
        assert_eq!(storage.get("k").unwrap(), None);
    }

    #[test]
    fn test_set_if_absent_refuses_replacement() {
        let storage = MemoryFlagStorage::new();
        assert_eq!(storage.set_if_absent("k", "a").unwrap(), None);
        assert_eq!(storage.set_if_absent("k", "b").unwrap().as_deref(), Some("a"));
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_empty_key_rejected() {
        let storage = MemoryFlagStorage::new();
        assert!(matches!(
            storage.set("", "v"),
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
