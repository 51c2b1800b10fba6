//! In-memory document store with fault injection.

use async_trait::async_trait;
use kuusi_core::effects::DocumentStoreEffects;
use kuusi_core::{GroupId, GroupRecord, StoreError, Uid};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Default)]
struct Inner {
    groups: HashMap<GroupId, GroupRecord>,
    user_groups: HashMap<Uid, Vec<GroupId>>,
    deleted_users: HashSet<Uid>,
    lookups: usize,
    member_writes: usize,
    user_group_writes: usize,
    fail_lookup: Option<StoreError>,
    fail_member_write: Option<StoreError>,
    fail_user_group_write: Option<StoreError>,
}

/// Document store double.
///
/// Group lookups can be held at a gate ([`hold_lookups`](Self::hold_lookups))
/// so a test can act while a lookup is suspended.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Mutex<Inner>>,
    gate: watch::Sender<bool>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    /// Empty store with the lookup gate open
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            gate,
        }
    }

    /// Insert or replace a group
    pub fn insert_group(&self, group: GroupRecord) {
        self.inner.lock().groups.insert(group.id.clone(), group);
    }

    /// Current copy of a group
    pub fn group(&self, id: &GroupId) -> Option<GroupRecord> {
        self.inner.lock().groups.get(id).cloned()
    }

    /// Groups listed on a user's record
    pub fn user_groups(&self, uid: &Uid) -> Vec<GroupId> {
        self.inner
            .lock()
            .user_groups
            .get(uid)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether `delete_user` was called for `uid`
    pub fn is_user_deleted(&self, uid: &Uid) -> bool {
        self.inner.lock().deleted_users.contains(uid)
    }

    /// Number of `get_group` calls
    pub fn lookups(&self) -> usize {
        self.inner.lock().lookups
    }

    /// Number of `update_group_members` calls
    pub fn member_writes(&self) -> usize {
        self.inner.lock().member_writes
    }

    /// Number of `update_user_groups` calls
    pub fn user_group_writes(&self) -> usize {
        self.inner.lock().user_group_writes
    }

    /// Make every subsequent lookup fail
    pub fn fail_lookups(&self, error: StoreError) {
        self.inner.lock().fail_lookup = Some(error);
    }

    /// Make every subsequent member write fail
    pub fn fail_member_writes(&self, error: StoreError) {
        self.inner.lock().fail_member_write = Some(error);
    }

    /// Make every subsequent user-groups write fail
    pub fn fail_user_group_writes(&self, error: StoreError) {
        self.inner.lock().fail_user_group_write = Some(error);
    }

    /// Suspend lookups until `release_lookups`
    pub fn hold_lookups(&self) {
        self.gate.send_replace(false);
    }

    /// Let suspended and future lookups proceed
    pub fn release_lookups(&self) {
        self.gate.send_replace(true);
    }
}

#[async_trait]
impl DocumentStoreEffects for MemoryDocumentStore {
    async fn get_group(&self, id: &GroupId) -> Result<Option<GroupRecord>, StoreError> {
        self.inner.lock().lookups += 1;

        let mut gate = self.gate.subscribe();
        if gate.wait_for(|open| *open).await.is_err() {
            return Err(StoreError::unavailable("store dropped"));
        }

        let inner = self.inner.lock();
        if let Some(error) = &inner.fail_lookup {
            return Err(error.clone());
        }
        Ok(inner.groups.get(id).cloned())
    }

    async fn update_group_members(&self, id: &GroupId, uid: &Uid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.member_writes += 1;
        if let Some(error) = &inner.fail_member_write {
            return Err(error.clone());
        }
        let group = inner
            .groups
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(format!("groups/{id}")))?;
        if !group.has_member(uid) {
            group.members.push(uid.clone());
        }
        Ok(())
    }

    async fn update_user_groups(&self, uid: &Uid, group: &GroupId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.user_group_writes += 1;
        if let Some(error) = &inner.fail_user_group_write {
            return Err(error.clone());
        }
        let groups = inner.user_groups.entry(uid.clone()).or_default();
        if !groups.contains(group) {
            groups.push(group.clone());
        }
        Ok(())
    }

    async fn delete_user(&self, uid: &Uid) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.user_groups.remove(uid);
        inner.deleted_users.insert(uid.clone());
        Ok(())
    }
}
