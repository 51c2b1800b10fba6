//! Navigation guard
//!
//! Re-evaluated on every identity change, location change, and deferred-join
//! completion for as long as it is mounted. Each evaluation feeds the current
//! facts to [`decide`] and applies the resulting [`GuardAction`].
//!
//! | Identity | Condition | Action |
//! |---|---|---|
//! | verified | join in flight | stay |
//! | verified | pending join | resolve join |
//! | verified | public location | route to `/home` |
//! | verified | auth-only location | stay |
//! | unverified | not on `/verify-email` | route to `/verify-email` |
//! | unverified | on `/verify-email` | stay |
//! | signed out | public location | stay |
//! | signed out | auth-only location | route to `/auth` |
//!
//! Unclassified locations count as auth-only. Applying an action never
//! produces a location for which [`decide`] would act again.

use crate::flags::{PendingJoin, PendingJoinSlot, PersistedFlags};
use crate::identity::{IdentityStream, IdentityWatcher};
use crate::join::{DeferredJoinResolver, JoinResolution};
use crate::routes::{effective_class, RouteClass, Screen};
use crate::task::{Liveness, MountedTask};
use crate::verification::{PollHandle, VerificationPoller};
use kuusi_core::effects::RouterEffects;
use kuusi_core::{IdentitySnapshot, Location, Uid, VerifiedIdentity};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Facts a single guard evaluation depends on.
#[derive(Debug, Clone, Copy)]
pub struct GuardInputs<'a> {
    /// Current identity
    pub identity: &'a IdentitySnapshot,
    /// Current location
    pub location: &'a Location,
    /// A join intent is stored
    pub pending_join: bool,
    /// A join intent has been taken and is being applied
    pub join_in_flight: bool,
}

/// What the guard should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardAction {
    /// Leave the location alone
    Stay,
    /// Replace the location
    RouteTo(Location),
    /// Hand the pending join to the deferred join resolver
    ResolveJoin,
}

/// Decide the guard action for `inputs`.
pub fn decide(inputs: &GuardInputs<'_>) -> GuardAction {
    let class = effective_class(inputs.location);
    match inputs.identity {
        IdentitySnapshot::SignedInVerified { .. } => {
            if inputs.join_in_flight {
                GuardAction::Stay
            } else if inputs.pending_join {
                GuardAction::ResolveJoin
            } else if class == RouteClass::Public {
                GuardAction::RouteTo(Screen::Home.location())
            } else {
                GuardAction::Stay
            }
        }
        IdentitySnapshot::SignedInUnverified { .. } => {
            if Screen::recognize(inputs.location) == Some(Screen::VerifyEmail) {
                GuardAction::Stay
            } else {
                GuardAction::RouteTo(Screen::VerifyEmail.location())
            }
        }
        IdentitySnapshot::SignedOut => {
            if class == RouteClass::Public {
                GuardAction::Stay
            } else {
                GuardAction::RouteTo(Screen::Auth.location())
            }
        }
    }
}

/// Adopt the newest snapshot delivered to `identity`, skipping any that a
/// later one already superseded.
fn sync_identity(state: &mut GuardState, identity: &mut IdentityStream) {
    let Some(latest) = identity.drain() else {
        return;
    };
    if state.identity.as_ref() != Some(latest) {
        tracing::debug!(identity = %latest, "Guard observed identity");
        state.identity = Some(latest.clone());
    }
}

struct JoinCompletion {
    uid: Uid,
    resolution: JoinResolution,
}

/// Mutable state of one mounted guard.
#[derive(Default)]
struct GuardState {
    identity: Option<IdentitySnapshot>,
    /// Deferred join being applied; dropping it abandons the result
    join: Option<MountedTask<()>>,
    poll: Option<PollHandle>,
    /// Landing location whose group id was already stashed
    landed_from: Option<Location>,
}

/// Continuously enforces which locations the current identity may see.
#[derive(Clone)]
pub struct NavigationGuard {
    watcher: IdentityWatcher,
    router: Arc<dyn RouterEffects>,
    flags: PersistedFlags,
    joins: DeferredJoinResolver,
    poller: VerificationPoller,
}

impl NavigationGuard {
    /// Create a guard
    pub fn new(
        watcher: IdentityWatcher,
        router: Arc<dyn RouterEffects>,
        flags: PersistedFlags,
        joins: DeferredJoinResolver,
        poller: VerificationPoller,
    ) -> Self {
        Self {
            watcher,
            router,
            flags,
            joins,
            poller,
        }
    }

    /// Start guarding. Dropping the handle unsubscribes from identity,
    /// stops verification polling, and abandons any in-flight join result.
    pub fn mount(&self) -> MountedTask<()> {
        let guard = self.clone();
        MountedTask::spawn("navigation-guard", move |liveness| async move {
            guard.run(liveness).await;
        })
    }

    async fn run(self, liveness: Liveness) {
        let mut identity = self.watcher.subscribe();
        let mut location = self.router.watch_location();
        let (join_tx, mut join_rx) = mpsc::unbounded_channel::<JoinCompletion>();
        let mut state = GuardState::default();

        loop {
            tokio::select! {
                // Identity first: a decision never runs while a newer
                // snapshot is already queued behind a location change.
                biased;
                snapshot = identity.next() => {
                    if snapshot.is_none() {
                        break;
                    }
                }
                changed = location.changed() => {
                    if changed.is_err() {
                        tracing::debug!("Router closed; guard stopping");
                        break;
                    }
                }
                Some(done) = join_rx.recv() => {
                    state.join = None;
                    sync_identity(&mut state, &mut identity);
                    self.complete_join(&state, done, &liveness);
                }
            }

            if !liveness.is_live() {
                break;
            }
            sync_identity(&mut state, &mut identity);
            self.evaluate(&mut state, &identity, &join_tx);
        }
    }

    /// One guard pass over the current facts.
    fn evaluate(
        &self,
        state: &mut GuardState,
        identity: &IdentityStream,
        join_tx: &mpsc::UnboundedSender<JoinCompletion>,
    ) {
        // Nothing is decided before the provider's initial resolution
        let Some(snapshot) = state.identity.clone() else {
            return;
        };
        self.manage_poller(state, &snapshot, identity);

        let location = self.router.current_location();
        if state.join.is_none() && snapshot.is_verified() {
            self.stash_from_landing(state, &location);
        }

        let inputs = GuardInputs {
            identity: &snapshot,
            location: &location,
            pending_join: self.flags.has_pending_join(),
            join_in_flight: state.join.is_some(),
        };
        match decide(&inputs) {
            GuardAction::Stay => {
                tracing::trace!(at = %location, identity = %snapshot, "Guard: stay");
            }
            GuardAction::RouteTo(to) => self.route(&location, &to),
            GuardAction::ResolveJoin => {
                match (self.joins.take_pending(), snapshot.verified()) {
                    (Some(pending), Some(verified)) => {
                        state.join = Some(self.start_join(pending, verified, join_tx.clone()));
                    }
                    _ => {
                        let inputs = GuardInputs {
                            pending_join: false,
                            ..inputs
                        };
                        if let GuardAction::RouteTo(to) = decide(&inputs) {
                            self.route(&location, &to);
                        }
                    }
                }
            }
        }
    }

    fn route(&self, from: &Location, to: &Location) {
        if from == to {
            return;
        }
        tracing::info!(from = %from, to = %to, "Guard redirect");
        self.router.replace(to);
    }

    /// Poll for verification exactly while the identity is unverified.
    fn manage_poller(
        &self,
        state: &mut GuardState,
        snapshot: &IdentitySnapshot,
        identity: &IdentityStream,
    ) {
        let unverified = matches!(snapshot, IdentitySnapshot::SignedInUnverified { .. });
        match (state.poll.is_some(), unverified) {
            (false, true) => {
                tracing::debug!(
                    interval_ms = self.poller.interval().as_millis() as u64,
                    "Starting verification poll"
                );
                state.poll = Some(self.poller.start(identity.injector()));
            }
            (true, false) => {
                if let Some(poll) = state.poll.take() {
                    poll.stop();
                }
            }
            _ => {}
        }
    }

    /// A verified user opening an invitation link joins without a detour
    /// through sign-in.
    fn stash_from_landing(&self, state: &mut GuardState, location: &Location) {
        let Some(Screen::GroupJoin(group_id)) = Screen::recognize(location) else {
            state.landed_from = None;
            return;
        };
        if state.landed_from.as_ref() == Some(location) {
            return;
        }
        state.landed_from = Some(location.clone());
        match self.flags.stash_pending_join(&group_id) {
            Ok(PendingJoinSlot::Stashed | PendingJoinSlot::AlreadyStashed) => {}
            Ok(PendingJoinSlot::Occupied(existing)) => {
                tracing::warn!(
                    group_id = %group_id,
                    pending = %existing,
                    "Another join is already pending; ignoring link"
                );
            }
            Err(e) => {
                tracing::warn!(group_id = %group_id, error = %e, "Failed to stash join intent");
            }
        }
    }

    fn start_join(
        &self,
        pending: PendingJoin,
        identity: VerifiedIdentity,
        done: mpsc::UnboundedSender<JoinCompletion>,
    ) -> MountedTask<()> {
        tracing::debug!(
            group_id = %pending.group_id(),
            uid = %identity.uid,
            "Applying deferred join"
        );
        let joins = self.joins.clone();
        MountedTask::spawn("deferred-join", move |_| async move {
            let resolution = joins.apply(pending, &identity).await;
            let _ = done.send(JoinCompletion {
                uid: identity.uid,
                resolution,
            });
        })
    }

    /// Route to the join destination if the same user is still verified.
    fn complete_join(&self, state: &GuardState, done: JoinCompletion, liveness: &Liveness) {
        let same_user = state
            .identity
            .as_ref()
            .and_then(IdentitySnapshot::verified)
            .is_some_and(|v| v.uid == done.uid);
        if !same_user || !liveness.is_live() {
            tracing::debug!(uid = %done.uid, "Discarding join result for a superseded identity");
            return;
        }
        let from = self.router.current_location();
        self.route(&from, &done.resolution.destination.location());
    }
}
