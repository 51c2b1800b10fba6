//! Session façade
//!
//! [`AppSession`] owns the injected collaborators and configuration, builds
//! the resolvers on demand, and exposes the operations a frontend calls.
//!
//! ## Boot
//!
//! ```text
//! location == "/" ──► splash (delay, inactivity, identity, invitation) ──► guard
//! deep link ───────► inactivity check ───────────────────────────────────► guard
//! ```
//!
//! The guard is mounted only after the splash has navigated, because a guard
//! at `/` would redirect a signed-in user before the inactivity check ran.

use crate::config::SessionConfig;
use crate::errors::AppError;
use crate::flags::{PendingJoinSlot, PersistedFlags};
use crate::guard::NavigationGuard;
use crate::identity::IdentityWatcher;
use crate::inactivity::{AppLifecycleEvent, InactivityMonitor};
use crate::invitation::InvitationGate;
use crate::join::DeferredJoinResolver;
use crate::routes::Screen;
use crate::splash::{SplashDestination, SplashResolver};
use crate::task::MountedTask;
use crate::verification::{self, VerificationPoller};
use kuusi_core::effects::{
    DocumentStoreEffects, FlagStorageEffects, IdentityProviderEffects, PhysicalTimeEffects,
    RouterEffects,
};
use kuusi_core::{GroupId, Location};
use std::sync::Arc;

/// Collaborators the session core depends on.
#[derive(Clone)]
pub struct SessionEffects {
    /// Persisted flag storage
    pub flags: Arc<dyn FlagStorageEffects>,
    /// Identity provider
    pub identity: Arc<dyn IdentityProviderEffects>,
    /// Document store
    pub store: Arc<dyn DocumentStoreEffects>,
    /// Router
    pub router: Arc<dyn RouterEffects>,
    /// Wall clock
    pub clock: Arc<dyn PhysicalTimeEffects>,
}

/// Entry point for frontends.
#[derive(Clone)]
pub struct AppSession {
    effects: SessionEffects,
    config: SessionConfig,
    flags: PersistedFlags,
    watcher: IdentityWatcher,
}

impl AppSession {
    /// Create a session. Fails if `config` is invalid.
    pub fn new(effects: SessionEffects, config: SessionConfig) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            flags: PersistedFlags::new(effects.flags.clone()),
            watcher: IdentityWatcher::new(effects.identity.clone()),
            effects,
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Typed access to persisted flags
    pub fn flags(&self) -> &PersistedFlags {
        &self.flags
    }

    /// Identity watcher over the injected provider
    pub fn watcher(&self) -> &IdentityWatcher {
        &self.watcher
    }

    /// Inactivity monitor with the configured threshold
    pub fn inactivity(&self) -> InactivityMonitor {
        InactivityMonitor::new(
            self.flags.clone(),
            self.effects.clock.clone(),
            self.config.inactivity_threshold(),
        )
    }

    /// Splash resolver with the configured delay
    pub fn splash(&self) -> SplashResolver {
        SplashResolver::new(
            self.watcher.clone(),
            self.effects.router.clone(),
            self.flags.clone(),
            self.inactivity(),
            self.config.splash_delay(),
        )
    }

    /// Navigation guard
    pub fn guard(&self) -> NavigationGuard {
        NavigationGuard::new(
            self.watcher.clone(),
            self.effects.router.clone(),
            self.flags.clone(),
            DeferredJoinResolver::new(self.flags.clone(), self.effects.store.clone()),
            VerificationPoller::new(self.watcher.clone(), self.config.verification_poll_interval()),
        )
    }

    /// Invitation gate with the configured code
    pub fn invitation_gate(&self) -> InvitationGate {
        InvitationGate::new(self.flags.clone(), self.config.invitation_code.clone())
    }

    /// Mount the splash resolver
    pub fn mount_splash(&self) -> MountedTask<Option<SplashDestination>> {
        self.splash().mount()
    }

    /// Mount the navigation guard
    pub fn mount_guard(&self) -> MountedTask<()> {
        self.guard().mount()
    }

    /// Make the first routing decision for the current location, then mount
    /// the guard.
    ///
    /// Dropping the returned future before it completes leaves nothing
    /// mounted.
    pub async fn boot(&self) -> MountedTask<()> {
        let at = self.effects.router.current_location();
        if Screen::recognize(&at) == Some(Screen::Splash) {
            let destination = self.splash().run().await;
            tracing::debug!(%destination, "Splash complete; mounting guard");
        } else {
            tracing::debug!(at = %at, "Deep link; skipping splash");
            self.inactivity().enforce(&self.watcher).await;
        }
        self.mount_guard()
    }

    /// Forward an app lifecycle event
    pub fn on_lifecycle(&self, event: AppLifecycleEvent) {
        self.inactivity().on_lifecycle(event);
    }

    /// Check an invitation code and move to sign-in on success.
    pub fn submit_invitation_code(&self, input: &str) -> Result<Location, AppError> {
        let to = self.invitation_gate().submit_code(input)?.location();
        self.effects.router.replace(&to);
        Ok(to)
    }

    /// Record a group-join intent from an invitation link.
    ///
    /// A signed-out user is sent to sign-in; the guard applies the intent
    /// once the identity is verified.
    pub async fn stash_join_intent(&self, group_id: &GroupId) -> Result<PendingJoinSlot, AppError> {
        let slot = self.flags.stash_pending_join(group_id)?;
        match &slot {
            PendingJoinSlot::Occupied(existing) => {
                tracing::warn!(
                    group_id = %group_id,
                    pending = %existing,
                    "Another join is already pending; keeping it"
                );
            }
            _ => tracing::info!(group_id = %group_id, "Stashed join intent"),
        }

        if !self.watcher.refresh().await.is_signed_in() {
            self.effects.router.replace(&Screen::Auth.location());
        }
        Ok(slot)
    }

    /// Re-send the verification email
    pub async fn resend_verification_email(&self) -> Result<(), AppError> {
        verification::resend_verification_email(self.effects.identity.as_ref()).await
    }

    /// Delete the unverified account and return to sign-in
    pub async fn restart_sign_up(&self) -> Result<(), AppError> {
        verification::restart_sign_up(
            &self.watcher,
            self.effects.identity.as_ref(),
            self.effects.store.as_ref(),
            self.effects.router.as_ref(),
        )
        .await
    }
}
