//! Deferred group join
//!
//! A group invitation link (`/group/join/:groupId`) stashes the group id
//! before sign-in. Once the identity is verified, the navigation guard takes
//! the intent out of storage with [`DeferredJoinResolver::take_pending`] and
//! hands it to [`DeferredJoinResolver::apply`], which adds the user to the
//! group and picks a destination.
//!
//! The intent is removed from storage before any remote call, so it is
//! cleared exactly once whatever the outcome, and a failed join is never
//! retried on a later sign-in.
//!
//! The two membership writes (group members, then the user's group list) are
//! independent documents. If the second fails the group keeps the new
//! member; the resolver reports the failure and routes home without
//! compensating.

use crate::flags::{PendingJoin, PersistedFlags};
use crate::routes::{group_edit_screen, Screen};
use kuusi_core::effects::DocumentStoreEffects;
use kuusi_core::{GroupId, StoreError, VerifiedIdentity};
use std::fmt;
use std::sync::Arc;

/// What happened to a join intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The user was added to the group
    Joined,
    /// The user was already a member; nothing was written
    AlreadyMember,
    /// No group with that id exists
    GroupNotFound,
    /// A lookup or write failed
    Failed(StoreError),
}

impl fmt::Display for JoinOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joined => f.write_str("joined"),
            Self::AlreadyMember => f.write_str("already-member"),
            Self::GroupNotFound => f.write_str("group-not-found"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

/// A consumed intent and where the user should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinResolution {
    /// Where to send the user
    pub destination: Screen,
    /// What happened
    pub outcome: JoinOutcome,
}

/// Applies stashed group-join intents for verified users.
#[derive(Clone)]
pub struct DeferredJoinResolver {
    flags: PersistedFlags,
    store: Arc<dyn DocumentStoreEffects>,
}

impl DeferredJoinResolver {
    /// Create a resolver
    pub fn new(flags: PersistedFlags, store: Arc<dyn DocumentStoreEffects>) -> Self {
        Self { flags, store }
    }

    /// Remove the pending intent from storage. At most one caller ever
    /// receives a given intent.
    pub fn take_pending(&self) -> Option<PendingJoin> {
        match self.flags.take_pending_join() {
            Ok(taken) => taken,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to take pending join; skipping");
                None
            }
        }
    }

    /// Apply an intent already removed from storage.
    pub async fn apply(&self, pending: PendingJoin, identity: &VerifiedIdentity) -> JoinResolution {
        let group_id = pending.into_group_id();
        let outcome = match self.join(&group_id, identity).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(group_id = %group_id, uid = %identity.uid, error = %e, "Deferred join failed");
                JoinOutcome::Failed(e)
            }
        };

        let destination = match outcome {
            JoinOutcome::Joined | JoinOutcome::AlreadyMember => group_edit_screen(),
            JoinOutcome::GroupNotFound | JoinOutcome::Failed(_) => Screen::Home,
        };
        tracing::info!(
            group_id = %group_id,
            uid = %identity.uid,
            %outcome,
            to = %destination,
            "Resolved deferred join"
        );
        JoinResolution {
            destination,
            outcome,
        }
    }

    async fn join(
        &self,
        group_id: &GroupId,
        identity: &VerifiedIdentity,
    ) -> Result<JoinOutcome, StoreError> {
        let Some(group) = self.store.get_group(group_id).await? else {
            tracing::warn!(group_id = %group_id, "Group for deferred join does not exist");
            return Ok(JoinOutcome::GroupNotFound);
        };
        if group.has_member(&identity.uid) {
            return Ok(JoinOutcome::AlreadyMember);
        }
        self.store
            .update_group_members(group_id, &identity.uid)
            .await?;
        self.store
            .update_user_groups(&identity.uid, group_id)
            .await?;
        Ok(JoinOutcome::Joined)
    }
}
