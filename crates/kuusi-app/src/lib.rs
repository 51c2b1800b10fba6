//! # Kuusi App
//!
//! Session bootstrap and navigation guard for the Kuusi photo-sharing
//! client. Decides, on every identity or route change, which screen the user
//! may see, coordinating four independently arriving facts:
//!
//! - remote identity state ([`identity::IdentityWatcher`])
//! - the locally persisted invitation flag ([`flags::PersistedFlags`])
//! - email-verification status ([`verification::VerificationPoller`])
//! - a deferred "join this group after sign-in" intent
//!   ([`join::DeferredJoinResolver`])
//!
//! and forcing sign-out after inactivity ([`inactivity::InactivityMonitor`]).
//!
//! ## Architecture
//!
//! ```text
//!  IdentityWatcher ──┐                 ┌── SplashResolver (once)
//!                    ├──► decisions ───┤
//!  PersistedFlags ───┘                 └── NavigationGuard (continuous)
//!                                             │
//!                                             └── DeferredJoinResolver
//! ```
//!
//! Decisions are pure functions ([`guard::decide`], [`splash::decide_splash`],
//! [`routes::classify`]); the mounted drivers only feed them inputs and apply
//! the resulting action through [`kuusi_core::effects::RouterEffects`].
//!
//! All collaborators are injected as effect traits via
//! [`session::SessionEffects`], so the whole core runs headless under test.

pub mod config;
pub mod errors;
pub mod flags;
pub mod guard;
pub mod identity;
pub mod inactivity;
pub mod invitation;
pub mod join;
pub mod routes;
pub mod session;
pub mod splash;
pub mod task;
pub mod verification;

pub use config::{ConfigError, SessionConfig};
pub use errors::{AppError, ErrorCategory};
pub use flags::{PendingJoin, PendingJoinSlot, PersistedFlags};
pub use guard::{decide, GuardAction, GuardInputs, NavigationGuard};
pub use identity::{IdentityStream, IdentityWatcher, SnapshotInjector};
pub use inactivity::{AppLifecycleEvent, InactivityMonitor};
pub use invitation::InvitationGate;
pub use join::{DeferredJoinResolver, JoinOutcome, JoinResolution};
pub use routes::{classify, RouteClass, Screen, UserPage};
pub use session::{AppSession, SessionEffects};
pub use splash::{decide_splash, SplashDestination, SplashResolver};
pub use task::{Liveness, MountedTask};
pub use verification::{PollHandle, VerificationPoller};
