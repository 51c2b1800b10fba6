//! Inactivity monitor
//!
//! Records when the app was last hidden or closed and, on the next launch,
//! forces sign-out if more than the threshold has elapsed.

use crate::flags::PersistedFlags;
use crate::identity::IdentityWatcher;
use kuusi_core::effects::PhysicalTimeEffects;
use kuusi_core::StorageError;
use std::sync::Arc;
use std::time::Duration;

/// App visibility transitions reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycleEvent {
    /// The app moved to the background
    Hidden,
    /// The app returned to the foreground
    Visible,
    /// The window is about to unload
    BeforeUnload,
}

impl AppLifecycleEvent {
    /// Whether this event marks the end of a period of activity.
    pub fn is_activity_boundary(self) -> bool {
        matches!(self, Self::Hidden | Self::BeforeUnload)
    }
}

/// Whether the gap since `last_active_ms` is strictly longer than
/// `threshold`. No recorded activity, or a timestamp in the future, never
/// forces sign-out.
pub fn exceeds_threshold(last_active_ms: Option<u64>, now_ms: u64, threshold: Duration) -> bool {
    let Some(last) = last_active_ms else {
        return false;
    };
    let threshold_ms = u64::try_from(threshold.as_millis()).unwrap_or(u64::MAX);
    now_ms.saturating_sub(last) > threshold_ms
}

/// Tracks activity boundaries in persisted flags.
#[derive(Clone)]
pub struct InactivityMonitor {
    flags: PersistedFlags,
    clock: Arc<dyn PhysicalTimeEffects>,
    threshold: Duration,
}

impl InactivityMonitor {
    /// Create a monitor with the given forced sign-out threshold
    pub fn new(flags: PersistedFlags, clock: Arc<dyn PhysicalTimeEffects>, threshold: Duration) -> Self {
        Self {
            flags,
            clock,
            threshold,
        }
    }

    /// Configured threshold
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Write `lastActiveAt = now`.
    pub fn record_activity_boundary(&self) -> Result<(), StorageError> {
        let now = self.clock.now_ms();
        self.flags.record_last_active(now)?;
        tracing::debug!(last_active_at = now, "Recorded activity boundary");
        Ok(())
    }

    /// Handle a lifecycle event from the host.
    pub fn on_lifecycle(&self, event: AppLifecycleEvent) {
        if !event.is_activity_boundary() {
            return;
        }
        if let Err(e) = self.record_activity_boundary() {
            tracing::warn!(?event, error = %e, "Failed to record activity boundary");
        }
    }

    /// Whether the session recorded before `now_ms` has been idle longer
    /// than `threshold`.
    pub fn should_force_sign_out(&self, now_ms: u64, threshold: Duration) -> bool {
        exceeds_threshold(self.flags.last_active_at(), now_ms, threshold)
    }

    /// [`should_force_sign_out`](Self::should_force_sign_out) against the
    /// clock and configured threshold.
    pub fn is_expired(&self) -> bool {
        self.should_force_sign_out(self.clock.now_ms(), self.threshold)
    }

    /// Sign out if the previous session expired. Returns whether it did.
    ///
    /// A failed sign-out is logged. `identity` keeps reporting signed out
    /// until the provider confirms a sign-out or a new sign-in.
    pub async fn enforce(&self, identity: &IdentityWatcher) -> bool {
        if !self.is_expired() {
            return false;
        }
        tracing::info!(
            last_active_at = ?self.flags.last_active_at(),
            threshold_ms = self.threshold.as_millis() as u64,
            "Inactivity threshold exceeded; forcing sign-out"
        );
        if let Err(e) = identity.force_sign_out().await {
            tracing::warn!(error = %e, "Forced sign-out failed");
        }
        true
    }
}
