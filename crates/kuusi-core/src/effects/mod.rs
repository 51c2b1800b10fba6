//! Effect traits for external collaborators.
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `kuusi-effects` (production), `kuusi-testkit` (tests)
//! - **Usage**: `kuusi-app` state machines depend only on these traits
//!
//! | Trait | Collaborator |
//! |---|---|
//! | [`FlagStorageEffects`] | browser-local key/value storage |
//! | [`IdentityProviderEffects`] | hosted identity service |
//! | [`DocumentStoreEffects`] | hosted document store |
//! | [`RouterEffects`] | client-side router |
//! | [`PhysicalTimeEffects`] | wall clock |

pub mod flags;
pub mod identity;
pub mod router;
pub mod store;
pub mod time;

pub use flags::FlagStorageEffects;
pub use identity::{IdentityCallback, IdentityProviderEffects, ProviderSubscription};
pub use router::RouterEffects;
pub use store::DocumentStoreEffects;
pub use time::PhysicalTimeEffects;
