//! Offline identity provider
//!
//! Used by the host binary and demo setups that have no connection to the
//! hosted identity service. It reports `SignedOut` once on subscription and
//! rejects every account operation.

use async_trait::async_trait;
use kuusi_core::effects::{IdentityCallback, IdentityProviderEffects, ProviderSubscription};
use kuusi_core::{IdentityError, ProviderUser};

/// Identity provider that never has a signed-in user.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineIdentityProvider;

impl OfflineIdentityProvider {
    /// Create an offline provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdentityProviderEffects for OfflineIdentityProvider {
    fn on_identity_changed(&self, callback: IdentityCallback) -> ProviderSubscription {
        callback(Ok(None));
        ProviderSubscription::noop()
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        Ok(())
    }

    async fn reload_current_user(&self) -> Result<Option<ProviderUser>, IdentityError> {
        Ok(None)
    }

    async fn send_email_verification(&self) -> Result<(), IdentityError> {
        Err(IdentityError::NoCurrentUser)
    }

    async fn delete_current_user(&self) -> Result<(), IdentityError> {
        Err(IdentityError::NoCurrentUser)
    }
}
