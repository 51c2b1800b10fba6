//! Kuusi Testing Infrastructure
//!
//! Scripted stand-ins for the hosted collaborators so session behaviour can
//! be driven deterministically:
//!
//! - [`ScriptedIdentityProvider`]: emit identity changes on demand, hold the
//!   initial resolution, replay late callbacks to detached listeners
//! - [`MemoryDocumentStore`]: groups and user records with write counters,
//!   fault injection, and a lookup gate
//! - [`RecordingRouter`]: a router that records every replacement
//!
//! ```rust,ignore
//! let identity = Arc::new(ScriptedIdentityProvider::signed_out());
//! let router = Arc::new(RecordingRouter::at("/"));
//! identity.emit(Some(verified_user("u1")));
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod fixtures;
pub mod identity;
pub mod router;
pub mod store;

pub use fixtures::*;
pub use identity::ScriptedIdentityProvider;
pub use router::RecordingRouter;
pub use store::MemoryDocumentStore;

// Re-export handlers tests commonly pair with the doubles above
pub use kuusi_effects::{MemoryFlagStorage, SimulatedClock};
