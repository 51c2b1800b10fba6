//! Normalized identity state.
//!
//! The identity provider reports a raw user record (or nothing, or an error).
//! Everything downstream consumes [`IdentitySnapshot`] instead, which has
//! exactly three shapes and collapses every failure to `SignedOut`.

use crate::errors::IdentityError;
use crate::identifiers::Uid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw user record as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    /// Provider-issued user id
    pub uid: Uid,
    /// Email address, if the account has one
    pub email: Option<String>,
    /// Whether the email address has been confirmed
    pub email_verified: bool,
}

impl ProviderUser {
    /// Construct a user record.
    pub fn new(uid: impl Into<String>, email: impl Into<String>, email_verified: bool) -> Self {
        Self {
            uid: Uid::new(uid),
            email: Some(email.into()),
            email_verified,
        }
    }
}

/// The core's view of who is signed in.
///
/// Produced only by the identity watcher and replaced wholesale on each
/// provider callback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdentitySnapshot {
    /// Nobody is signed in, or identity could not be resolved
    #[default]
    SignedOut,
    /// Signed in, email not yet confirmed
    SignedInUnverified {
        /// User id
        uid: Uid,
        /// Email address
        email: Option<String>,
    },
    /// Signed in with a confirmed email
    SignedInVerified {
        /// User id
        uid: Uid,
        /// Email address
        email: Option<String>,
    },
}

impl IdentitySnapshot {
    /// Normalize a provider report. Errors fail toward the least privileged
    /// state.
    pub fn from_provider(report: Result<Option<ProviderUser>, IdentityError>) -> Self {
        match report {
            Ok(Some(user)) => Self::from_user(user),
            Ok(None) | Err(_) => Self::SignedOut,
        }
    }

    /// Normalize a known user record.
    pub fn from_user(user: ProviderUser) -> Self {
        if user.email_verified {
            Self::SignedInVerified {
                uid: user.uid,
                email: user.email,
            }
        } else {
            Self::SignedInUnverified {
                uid: user.uid,
                email: user.email,
            }
        }
    }

    /// True for both signed-in variants.
    pub fn is_signed_in(&self) -> bool {
        !matches!(self, Self::SignedOut)
    }

    /// True only for a signed-in identity with a confirmed email.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::SignedInVerified { .. })
    }

    /// The signed-in user id, if any.
    pub fn uid(&self) -> Option<&Uid> {
        match self {
            Self::SignedOut => None,
            Self::SignedInUnverified { uid, .. } | Self::SignedInVerified { uid, .. } => Some(uid),
        }
    }

    /// Project a verified snapshot into a [`VerifiedIdentity`].
    pub fn verified(&self) -> Option<VerifiedIdentity> {
        match self {
            Self::SignedInVerified { uid, email } => Some(VerifiedIdentity {
                uid: uid.clone(),
                email: email.clone(),
            }),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SignedOut => "signed-out",
            Self::SignedInUnverified { .. } => "signed-in-unverified",
            Self::SignedInVerified { .. } => "signed-in-verified",
        }
    }
}

impl fmt::Display for IdentitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Evidence that an identity is signed in with a confirmed email.
///
/// Only obtainable from [`IdentitySnapshot::verified`], so operations that
/// require a verified user take this instead of a raw snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// User id
    pub uid: Uid,
    /// Email address
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_collapses_to_signed_out() {
        let snapshot = IdentitySnapshot::from_provider(Err(IdentityError::unavailable("offline")));
        assert_eq!(snapshot, IdentitySnapshot::SignedOut);
    }

    #[test]
    fn test_unverified_user_normalizes() {
        let snapshot =
            IdentitySnapshot::from_provider(Ok(Some(ProviderUser::new("u1", "a@b.c", false))));
        assert!(snapshot.is_signed_in());
        assert!(!snapshot.is_verified());
        assert!(snapshot.verified().is_none());
        assert_eq!(snapshot.uid().map(Uid::as_str), Some("u1"));
    }

    #[test]
    fn test_verified_projection() {
        let snapshot = IdentitySnapshot::from_user(ProviderUser::new("u1", "a@b.c", true));
        let verified = snapshot.verified().unwrap();
        assert_eq!(verified.uid.as_str(), "u1");
        assert_eq!(snapshot.to_string(), "signed-in-verified");
    }
}
