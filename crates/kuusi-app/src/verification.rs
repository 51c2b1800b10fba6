//! Email verification
//!
//! The provider does not push a notification when a user confirms their
//! email elsewhere, so while the identity is unverified the guard runs a
//! [`VerificationPoller`] that reloads the user on an interval and injects
//! the verified snapshot into the guard's identity stream.
//!
//! Also hosts the two actions offered on the verification screen.

use crate::errors::AppError;
use crate::identity::{IdentityWatcher, SnapshotInjector};
use crate::routes::Screen;
use crate::task::MountedTask;
use kuusi_core::effects::{DocumentStoreEffects, IdentityProviderEffects, RouterEffects};
use kuusi_core::IdentityError;
use std::time::Duration;

/// Periodic reload-and-check of email verification.
#[derive(Clone)]
pub struct VerificationPoller {
    watcher: IdentityWatcher,
    interval: Duration,
}

impl VerificationPoller {
    /// Poll through `watcher` every `interval`
    pub fn new(watcher: IdentityWatcher, interval: Duration) -> Self {
        Self { watcher, interval }
    }

    /// Poll interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling. The first reload happens one interval from now.
    pub fn start(&self, injector: SnapshotInjector) -> PollHandle {
        let watcher = self.watcher.clone();
        let interval = self.interval;
        let task = MountedTask::spawn("verification-poll", move |liveness| async move {
            let mut attempts = 0u32;
            loop {
                tokio::time::sleep(interval).await;
                attempts += 1;
                let snapshot = watcher.refresh().await;
                if !liveness.is_live() {
                    return;
                }
                if snapshot.is_verified() {
                    tracing::info!(attempts, "Email verification observed");
                    injector.inject(snapshot);
                    return;
                }
                tracing::trace!(attempts, identity = %snapshot, "Email not yet verified");
            }
        });
        PollHandle { task }
    }
}

/// Stops polling when stopped or dropped.
#[derive(Debug)]
pub struct PollHandle {
    task: MountedTask<()>,
}

impl PollHandle {
    /// Stop polling
    pub fn stop(self) {
        self.task.unmount();
    }

    /// Whether polling has ended on its own
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Ask the provider to send the verification email again.
pub async fn resend_verification_email(
    identity: &dyn IdentityProviderEffects,
) -> Result<(), AppError> {
    identity.send_email_verification().await?;
    tracing::info!("Verification email sent");
    Ok(())
}

/// Abandon an unverified account: delete the user document, then the
/// identity account, then return to sign-in.
///
/// Requires a signed-in user. The document is deleted first so a failure
/// leaves an account the user can still sign into.
pub async fn restart_sign_up(
    watcher: &IdentityWatcher,
    identity: &dyn IdentityProviderEffects,
    store: &dyn DocumentStoreEffects,
    router: &dyn RouterEffects,
) -> Result<(), AppError> {
    let current = watcher.refresh().await;
    let uid = current.uid().ok_or(IdentityError::NoCurrentUser)?;

    store.delete_user(uid).await?;
    identity.delete_current_user().await?;
    tracing::info!(uid = %uid, "Restarted sign-up");

    router.replace(&Screen::Auth.location());
    Ok(())
}
