//! Identity watcher
//!
//! Wraps the provider's push-based callback in a per-consumer stream of
//! normalized [`IdentitySnapshot`]s.
//!
//! Each [`IdentityStream`] owns one provider subscription and a liveness
//! flag. Dropping the stream clears the flag before detaching, so a callback
//! the provider fires late for a superseded subscription is discarded and
//! never overwrites the snapshot a newer subscription delivered.
//!
//! After a forced sign-out the watcher holds the session signed out: a
//! signed-in initial resolution or reload is reported as
//! [`IdentitySnapshot::SignedOut`] until the provider reports a sign-out or a
//! fresh sign-in. A sign-out call that fails therefore never lets the expired
//! session back in.

use kuusi_core::effects::{IdentityProviderEffects, ProviderSubscription};
use kuusi_core::{IdentityError, IdentitySnapshot, ProviderUser};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Normalize a provider report, logging failures.
fn normalize(report: Result<Option<ProviderUser>, IdentityError>) -> IdentitySnapshot {
    if let Err(e) = &report {
        tracing::warn!(error = %e, "Identity resolution failed; treating as signed out");
    }
    IdentitySnapshot::from_provider(report)
}

/// Shared "treat as signed out" latch set by a forced sign-out.
#[derive(Clone, Default)]
struct SignOutHold(Arc<AtomicBool>);

impl SignOutHold {
    fn engage(&self) {
        self.0.store(true, Ordering::Release);
    }

    fn is_engaged(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Filter `snapshot` through the hold. `restates_session` is true for
    /// reports that only restate the provider's persisted session (initial
    /// resolutions and reloads) rather than announce a new sign-in.
    fn admit(&self, snapshot: IdentitySnapshot, restates_session: bool) -> IdentitySnapshot {
        if !self.is_engaged() {
            return snapshot;
        }
        if !snapshot.is_signed_in() {
            tracing::debug!("Provider reports signed out; releasing sign-out hold");
            self.0.store(false, Ordering::Release);
            return snapshot;
        }
        if restates_session {
            tracing::debug!(identity = %snapshot, "Holding expired session signed out");
            return IdentitySnapshot::SignedOut;
        }
        tracing::debug!(identity = %snapshot, "New sign-in; releasing sign-out hold");
        self.0.store(false, Ordering::Release);
        snapshot
    }
}

/// Source of identity streams.
#[derive(Clone)]
pub struct IdentityWatcher {
    provider: Arc<dyn IdentityProviderEffects>,
    hold: SignOutHold,
}

impl IdentityWatcher {
    /// Watch `provider`
    pub fn new(provider: Arc<dyn IdentityProviderEffects>) -> Self {
        Self {
            provider,
            hold: SignOutHold::default(),
        }
    }

    /// Sign the provider out and hold every stream of this watcher (and its
    /// clones) signed out until the provider confirms it.
    ///
    /// The hold is engaged even when the provider call fails.
    pub async fn force_sign_out(&self) -> Result<(), IdentityError> {
        self.hold.engage();
        self.provider.sign_out().await
    }

    /// Whether a forced sign-out is still awaiting provider confirmation
    pub fn is_holding_signed_out(&self) -> bool {
        self.hold.is_engaged()
    }

    /// Open a new subscription.
    ///
    /// The provider delivers the current state once (possibly later), then
    /// every change.
    pub fn subscribe(&self) -> IdentityStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let live = Arc::new(AtomicBool::new(true));

        let callback_tx = tx.clone();
        let callback_live = live.clone();
        let hold = self.hold.clone();
        let awaiting_initial = AtomicBool::new(true);
        let subscription = self.provider.on_identity_changed(Box::new(move |report| {
            if !callback_live.load(Ordering::Acquire) {
                tracing::debug!("Discarding identity callback for a closed subscription");
                return;
            }
            let initial = awaiting_initial.swap(false, Ordering::AcqRel);
            let _ = callback_tx.send(hold.admit(normalize(report), initial));
        }));

        IdentityStream {
            rx,
            tx,
            live,
            latest: None,
            subscription,
        }
    }

    /// Reload the current user from the provider and normalize it.
    ///
    /// Does not notify any stream.
    pub async fn refresh(&self) -> IdentitySnapshot {
        self.hold
            .admit(normalize(self.provider.reload_current_user().await), true)
    }
}

/// One consumer's view of identity changes.
pub struct IdentityStream {
    rx: mpsc::UnboundedReceiver<IdentitySnapshot>,
    tx: mpsc::UnboundedSender<IdentitySnapshot>,
    live: Arc<AtomicBool>,
    latest: Option<IdentitySnapshot>,
    subscription: ProviderSubscription,
}

impl IdentityStream {
    /// Wait for the next snapshot.
    ///
    /// Cancel safe. Returns `None` only if every sender is gone, which
    /// cannot happen while the stream is alive.
    pub async fn next(&mut self) -> Option<IdentitySnapshot> {
        let snapshot = self.rx.recv().await?;
        self.latest = Some(snapshot.clone());
        Some(snapshot)
    }

    /// The most recent snapshot this stream has yielded
    pub fn latest(&self) -> Option<&IdentitySnapshot> {
        self.latest.as_ref()
    }

    /// Consume every snapshot already delivered, returning the newest.
    pub fn drain(&mut self) -> Option<&IdentitySnapshot> {
        while let Ok(snapshot) = self.rx.try_recv() {
            self.latest = Some(snapshot);
        }
        self.latest.as_ref()
    }

    /// The current identity: the newest delivered snapshot, or the initial
    /// resolution if the provider has not delivered one yet.
    pub async fn current(&mut self) -> IdentitySnapshot {
        if let Some(snapshot) = self.drain() {
            return snapshot.clone();
        }
        self.next().await.unwrap_or_default()
    }

    /// A handle that feeds snapshots into this stream.
    pub fn injector(&self) -> SnapshotInjector {
        SnapshotInjector {
            tx: self.tx.clone(),
            live: self.live.clone(),
        }
    }

    /// Whether the subscription is still attached
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

impl Drop for IdentityStream {
    fn drop(&mut self) {
        self.live.store(false, Ordering::Release);
        self.subscription.unsubscribe();
    }
}

/// Feeds snapshots observed outside the provider callback (the
/// email-verification poll) into an [`IdentityStream`].
#[derive(Clone)]
pub struct SnapshotInjector {
    tx: mpsc::UnboundedSender<IdentitySnapshot>,
    live: Arc<AtomicBool>,
}

impl SnapshotInjector {
    /// Deliver `snapshot`. Returns false if the stream is closed.
    pub fn inject(&self, snapshot: IdentitySnapshot) -> bool {
        if !self.live.load(Ordering::Acquire) {
            return false;
        }
        self.tx.send(snapshot).is_ok()
    }
}
