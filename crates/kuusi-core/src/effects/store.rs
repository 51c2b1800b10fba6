//! Hosted document store interface (groups and user records).

use crate::errors::StoreError;
use crate::group::GroupRecord;
use crate::identifiers::{GroupId, Uid};
use async_trait::async_trait;
use std::sync::Arc;

/// Document store operations used by the session core.
///
/// The two update operations are array-union writes: adding a value that is
/// already present leaves the list unchanged. They are independent
/// documents and the store gives no transaction across them.
#[async_trait]
pub trait DocumentStoreEffects: Send + Sync {
    /// Fetch a group document. `Ok(None)` when it does not exist.
    async fn get_group(&self, id: &GroupId) -> Result<Option<GroupRecord>, StoreError>;

    /// Add `uid` to the group's member list.
    async fn update_group_members(&self, id: &GroupId, uid: &Uid) -> Result<(), StoreError>;

    /// Add `group` to the user's group list.
    async fn update_user_groups(&self, uid: &Uid, group: &GroupId) -> Result<(), StoreError>;

    /// Delete the user document.
    async fn delete_user(&self, uid: &Uid) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: DocumentStoreEffects + ?Sized> DocumentStoreEffects for Arc<T> {
    async fn get_group(&self, id: &GroupId) -> Result<Option<GroupRecord>, StoreError> {
        (**self).get_group(id).await
    }

    async fn update_group_members(&self, id: &GroupId, uid: &Uid) -> Result<(), StoreError> {
        (**self).update_group_members(id, uid).await
    }

    async fn update_user_groups(&self, uid: &Uid, group: &GroupId) -> Result<(), StoreError> {
        (**self).update_user_groups(uid, group).await
    }

    async fn delete_user(&self, uid: &Uid) -> Result<(), StoreError> {
        (**self).delete_user(uid).await
    }
}
