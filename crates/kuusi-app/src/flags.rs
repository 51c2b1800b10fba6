//! Persisted session flags
//!
//! Typed access to the three keys this core shares with the rest of the
//! application. Each key is independent; there is no transactional grouping.
//!
//! | Key | Value | Written by | Read by |
//! |---|---|---|---|
//! | `invitationVerified` | `"true"` or absent | invitation gate | splash |
//! | `lastActiveAt` | epoch millis | inactivity monitor | splash |
//! | `pendingJoinGroupId` | group id or absent | group-join landing | guard |
//!
//! Read failures are logged and read as "absent", which is always the least
//! privileged interpretation.

use kuusi_core::effects::FlagStorageEffects;
use kuusi_core::{GroupId, StorageError};
use std::sync::Arc;

/// Storage key for the invitation gate flag
pub const INVITATION_VERIFIED_KEY: &str = "invitationVerified";
/// Storage key for the last activity boundary
pub const LAST_ACTIVE_AT_KEY: &str = "lastActiveAt";
/// Storage key for the deferred group join
pub const PENDING_JOIN_GROUP_ID_KEY: &str = "pendingJoinGroupId";

const TRUE: &str = "true";

/// A deferred group-join intent removed from storage.
///
/// Only [`PersistedFlags::take_pending_join`] produces one, and it is not
/// `Clone`, so an intent can be applied at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingJoin {
    group_id: GroupId,
}

impl PendingJoin {
    /// The group to join
    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    /// Consume the intent
    pub fn into_group_id(self) -> GroupId {
        self.group_id
    }
}

/// Result of stashing a join intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingJoinSlot {
    /// The intent was written
    Stashed,
    /// The same group was already pending
    AlreadyStashed,
    /// A different group is pending and was left in place
    Occupied(GroupId),
}

/// Typed view over flag storage.
#[derive(Clone)]
pub struct PersistedFlags {
    storage: Arc<dyn FlagStorageEffects>,
}

impl PersistedFlags {
    /// Wrap a storage backend
    pub fn new(storage: Arc<dyn FlagStorageEffects>) -> Self {
        Self { storage }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Flag read failed; treating as absent");
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // invitationVerified
    // ------------------------------------------------------------------

    /// Whether the invitation gate has been passed on this device
    pub fn invitation_verified(&self) -> bool {
        self.read(INVITATION_VERIFIED_KEY).as_deref() == Some(TRUE)
    }

    /// Record that the invitation gate was passed
    pub fn mark_invitation_verified(&self) -> Result<(), StorageError> {
        self.storage.set(INVITATION_VERIFIED_KEY, TRUE)
    }

    // ------------------------------------------------------------------
    // lastActiveAt
    // ------------------------------------------------------------------

    /// The last recorded activity boundary, in epoch millis
    pub fn last_active_at(&self) -> Option<u64> {
        let raw = self.read(LAST_ACTIVE_AT_KEY)?;
        match raw.trim().parse() {
            Ok(ms) => Some(ms),
            Err(_) => {
                tracing::warn!(value = %raw, "Unparseable lastActiveAt; ignoring");
                None
            }
        }
    }

    /// Record an activity boundary
    pub fn record_last_active(&self, at_ms: u64) -> Result<(), StorageError> {
        self.storage.set(LAST_ACTIVE_AT_KEY, &at_ms.to_string())
    }

    // ------------------------------------------------------------------
    // pendingJoinGroupId
    // ------------------------------------------------------------------

    /// Whether a join intent is waiting, without consuming it
    pub fn has_pending_join(&self) -> bool {
        self.read(PENDING_JOIN_GROUP_ID_KEY).is_some()
    }

    /// Write a join intent unless a different one is already pending.
    pub fn stash_pending_join(&self, group_id: &GroupId) -> Result<PendingJoinSlot, StorageError> {
        match self
            .storage
            .set_if_absent(PENDING_JOIN_GROUP_ID_KEY, group_id.as_str())?
        {
            None => Ok(PendingJoinSlot::Stashed),
            Some(existing) if existing == group_id.as_str() => Ok(PendingJoinSlot::AlreadyStashed),
            Some(existing) => match GroupId::parse(&existing) {
                Some(existing) => Ok(PendingJoinSlot::Occupied(existing)),
                None => {
                    // Garbage in the slot never blocks a real intent
                    self.storage
                        .set(PENDING_JOIN_GROUP_ID_KEY, group_id.as_str())?;
                    Ok(PendingJoinSlot::Stashed)
                }
            },
        }
    }

    /// Remove and return the pending join intent.
    ///
    /// The slot is empty afterwards whatever it contained; an unparseable
    /// value is discarded.
    pub fn take_pending_join(&self) -> Result<Option<PendingJoin>, StorageError> {
        let Some(raw) = self.storage.take(PENDING_JOIN_GROUP_ID_KEY)? else {
            return Ok(None);
        };
        match GroupId::parse(&raw) {
            Some(group_id) => Ok(Some(PendingJoin { group_id })),
            None => {
                tracing::warn!(value = %raw, "Discarding malformed pendingJoinGroupId");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuusi_effects::MemoryFlagStorage;

    fn flags_with(entries: &[(&str, &str)]) -> (PersistedFlags, Arc<MemoryFlagStorage>) {
        let storage = Arc::new(MemoryFlagStorage::with_entries(entries.iter().copied()));
        (PersistedFlags::new(storage.clone()), storage)
    }

    #[test]
    fn test_invitation_flag_requires_exact_true() {
        let (flags, _) = flags_with(&[]);
        assert!(!flags.invitation_verified());
        flags.mark_invitation_verified().unwrap();
        assert!(flags.invitation_verified());

        let (flags, _) = flags_with(&[(INVITATION_VERIFIED_KEY, "yes")]);
        assert!(!flags.invitation_verified());
    }

    #[test]
    fn test_last_active_round_trip_and_garbage() {
        let (flags, _) = flags_with(&[]);
        assert_eq!(flags.last_active_at(), None);
        flags.record_last_active(1_700_000_000_000).unwrap();
        assert_eq!(flags.last_active_at(), Some(1_700_000_000_000));

        let (flags, _) = flags_with(&[(LAST_ACTIVE_AT_KEY, "yesterday")]);
        assert_eq!(flags.last_active_at(), None);
    }

    #[test]
    fn test_take_pending_join_is_one_shot() {
        let (flags, storage) = flags_with(&[(PENDING_JOIN_GROUP_ID_KEY, "G1")]);
        assert!(flags.has_pending_join());

        let pending = flags.take_pending_join().unwrap().unwrap();
        assert_eq!(pending.group_id().as_str(), "G1");
        assert!(flags.take_pending_join().unwrap().is_none());
        assert!(!flags.has_pending_join());
        assert!(storage.snapshot().is_empty());
    }

    #[test]
    fn test_take_discards_malformed_value() {
        let (flags, storage) = flags_with(&[(PENDING_JOIN_GROUP_ID_KEY, "  ")]);
        assert!(flags.take_pending_join().unwrap().is_none());
        assert!(storage.snapshot().is_empty());
    }

    #[test]
    fn test_stash_does_not_replace_pending_intent() {
        let (flags, _) = flags_with(&[]);
        let g1 = GroupId::parse("G1").unwrap();
        let g2 = GroupId::parse("G2").unwrap();

        assert_eq!(flags.stash_pending_join(&g1).unwrap(), PendingJoinSlot::Stashed);
        assert_eq!(
            flags.stash_pending_join(&g1).unwrap(),
            PendingJoinSlot::AlreadyStashed
        );
        assert_eq!(
            flags.stash_pending_join(&g2).unwrap(),
            PendingJoinSlot::Occupied(g1.clone())
        );
        assert_eq!(flags.take_pending_join().unwrap().unwrap().into_group_id(), g1);
    }
}
