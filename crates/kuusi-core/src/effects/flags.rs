//! Durable, synchronous string storage surviving reloads.

use crate::errors::StorageError;
use std::sync::Arc;

/// Key/value storage for persisted session flags.
///
/// Calls are synchronous, matching browser-local storage. Implementations
/// must make [`take`](FlagStorageEffects::take) atomic with respect to every
/// other call on the same backend.
pub trait FlagStorageEffects: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Returns whether it existed.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Read and delete a value in one step.
    fn take(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value only if the key is currently absent.
    ///
    /// Returns the existing value when the write was refused.
    fn set_if_absent(&self, key: &str, value: &str) -> Result<Option<String>, StorageError>;
}

impl<T: FlagStorageEffects + ?Sized> FlagStorageEffects for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key)
    }

    fn take(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).take(key)
    }

    fn set_if_absent(&self, key: &str, value: &str) -> Result<Option<String>, StorageError> {
        (**self).set_if_absent(key, value)
    }
}
