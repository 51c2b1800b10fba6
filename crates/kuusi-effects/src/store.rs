//! Offline document store

use async_trait::async_trait;
use kuusi_core::effects::DocumentStoreEffects;
use kuusi_core::{GroupId, GroupRecord, StoreError, Uid};

const OFFLINE: &str = "document store is offline";

/// Store with no backend. Every call fails as unavailable, which the session
/// core handles the same way it handles a network outage.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineDocumentStore;

impl OfflineDocumentStore {
    /// Create an offline store
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentStoreEffects for OfflineDocumentStore {
    async fn get_group(&self, _id: &GroupId) -> Result<Option<GroupRecord>, StoreError> {
        Err(StoreError::unavailable(OFFLINE))
    }

    async fn update_group_members(&self, _id: &GroupId, _uid: &Uid) -> Result<(), StoreError> {
        Err(StoreError::unavailable(OFFLINE))
    }

    async fn update_user_groups(&self, _uid: &Uid, _group: &GroupId) -> Result<(), StoreError> {
        Err(StoreError::unavailable(OFFLINE))
    }

    async fn delete_user(&self, _uid: &Uid) -> Result<(), StoreError> {
        Err(StoreError::unavailable(OFFLINE))
    }
}
