//! Splash resolver
//!
//! The one-shot first routing decision made from `/`. After the display
//! delay it checks inactivity, then the identity, then the invitation flag,
//! and issues exactly one route replacement.

use crate::flags::PersistedFlags;
use crate::identity::IdentityWatcher;
use crate::inactivity::InactivityMonitor;
use crate::routes::Screen;
use crate::task::{Liveness, MountedTask};
use kuusi_core::effects::RouterEffects;
use kuusi_core::{IdentitySnapshot, Location};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Terminal splash state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplashDestination {
    /// Signed in; the guard sorts out verification from there
    Home,
    /// Invitation gate not yet passed on this device
    Invite,
    /// Sign in
    Auth,
}

impl SplashDestination {
    /// Screen for this destination
    pub fn screen(self) -> Screen {
        match self {
            Self::Home => Screen::Home,
            Self::Invite => Screen::Invite,
            Self::Auth => Screen::Auth,
        }
    }

    /// Location for this destination
    pub fn location(self) -> Location {
        self.screen().location()
    }
}

impl fmt::Display for SplashDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.screen())
    }
}

/// Pick the splash destination. A forced sign-out wins over any identity.
pub fn decide_splash(
    force_sign_out: bool,
    identity: &IdentitySnapshot,
    invitation_verified: bool,
) -> SplashDestination {
    if force_sign_out {
        SplashDestination::Auth
    } else if identity.is_signed_in() {
        SplashDestination::Home
    } else if !invitation_verified {
        SplashDestination::Invite
    } else {
        SplashDestination::Auth
    }
}

/// Drives the splash decision against live collaborators.
#[derive(Clone)]
pub struct SplashResolver {
    watcher: IdentityWatcher,
    router: Arc<dyn RouterEffects>,
    flags: PersistedFlags,
    inactivity: InactivityMonitor,
    delay: Duration,
}

impl SplashResolver {
    /// Create a resolver that waits `delay` before deciding.
    ///
    /// `watcher` should be the one the guard mounted afterwards uses, so a
    /// forced sign-out here keeps holding there.
    pub fn new(
        watcher: IdentityWatcher,
        router: Arc<dyn RouterEffects>,
        flags: PersistedFlags,
        inactivity: InactivityMonitor,
        delay: Duration,
    ) -> Self {
        Self {
            watcher,
            router,
            flags,
            inactivity,
            delay,
        }
    }

    /// Wait out the display delay and decide, without navigating.
    ///
    /// The identity subscription is opened before the delay so the provider
    /// can resolve while the splash is showing.
    pub async fn evaluate(&self) -> SplashDestination {
        let mut identity = self.watcher.subscribe();
        tokio::time::sleep(self.delay).await;

        if self.inactivity.enforce(&self.watcher).await {
            return decide_splash(true, &IdentitySnapshot::SignedOut, self.flags.invitation_verified());
        }

        let snapshot = identity.current().await;
        let destination = decide_splash(false, &snapshot, self.flags.invitation_verified());
        tracing::debug!(identity = %snapshot, %destination, "Splash decided");
        destination
    }

    /// Decide and navigate.
    pub async fn run(&self) -> SplashDestination {
        let destination = self.evaluate().await;
        self.navigate(destination);
        destination
    }

    /// Run on a background task. Dropping the handle before the decision
    /// cancels it without navigating; the result is `None` in that case.
    pub fn mount(&self) -> MountedTask<Option<SplashDestination>> {
        let resolver = self.clone();
        MountedTask::spawn("splash", move |liveness| async move {
            resolver.resolve_while(&liveness).await
        })
    }

    async fn resolve_while(&self, liveness: &Liveness) -> Option<SplashDestination> {
        let destination = self.evaluate().await;
        if !liveness.is_live() {
            return None;
        }
        self.navigate(destination);
        Some(destination)
    }

    fn navigate(&self, destination: SplashDestination) {
        tracing::info!(to = %destination, "Leaving splash");
        self.router.replace(&destination.location());
    }
}
