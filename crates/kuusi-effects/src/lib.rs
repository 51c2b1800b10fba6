//! Kuusi Effects
//!
//! Stateless or self-contained handlers implementing the effect traits from
//! `kuusi-core`:
//!
//! - [`MemoryFlagStorage`] / [`FileFlagStorage`]: persisted flag backends
//! - [`SystemClock`] / [`SimulatedClock`]: wall-clock sources
//! - [`OfflineIdentityProvider`]: a provider that never signs anyone in
//! - [`OfflineDocumentStore`]: a store whose every call is unavailable
//! - [`HeadlessRouter`]: a router without a view layer
//!
//! Scripted doubles for the identity provider, document store, and router
//! live in `kuusi-testkit`.

pub mod identity;
pub mod router;
pub mod storage;
pub mod store;
pub mod time;

pub use identity::OfflineIdentityProvider;
pub use router::HeadlessRouter;
pub use store::OfflineDocumentStore;
pub use storage::{FileFlagStorage, MemoryFlagStorage};
pub use time::{SimulatedClock, SystemClock};
