//! Kuusi Core
//!
//! Foundation types for the Kuusi session core: identifiers, the normalized
//! identity snapshot, router locations, group records, and the effect traits
//! behind which every external collaborator sits.
//!
//! This crate has no runtime behaviour. Handlers live in `kuusi-effects`,
//! test doubles in `kuusi-testkit`, and the session state machines in
//! `kuusi-app`.
//!
//! ```text
//! kuusi-core (types + traits)
//!     ▲              ▲
//! kuusi-effects   kuusi-app ◄── kuusi-testkit (dev only)
//! ```

pub mod effects;
pub mod errors;
pub mod group;
pub mod identifiers;
pub mod identity;
pub mod location;

pub use errors::{IdentityError, StorageError, StoreError};
pub use group::GroupRecord;
pub use identifiers::{GroupId, Uid};
pub use identity::{IdentitySnapshot, ProviderUser, VerifiedIdentity};
pub use location::Location;
