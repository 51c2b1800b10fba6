//! Hosted identity provider interface.

use crate::errors::IdentityError;
use crate::identity::ProviderUser;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with the provider's current user on subscription and on
/// every subsequent change. `Ok(None)` means signed out.
pub type IdentityCallback =
    Box<dyn Fn(Result<Option<ProviderUser>, IdentityError>) + Send + Sync + 'static>;

/// Detaches a provider callback when dropped or explicitly unsubscribed.
pub struct ProviderSubscription {
    detach: Option<Box<dyn FnOnce() + Send + 'static>>,
}

impl ProviderSubscription {
    /// Wrap a detach closure.
    pub fn new(detach: impl FnOnce() + Send + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A subscription with nothing to detach.
    pub fn noop() -> Self {
        Self { detach: None }
    }

    /// Detach now. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for ProviderSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for ProviderSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSubscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Identity provider operations used by the session core.
#[async_trait]
pub trait IdentityProviderEffects: Send + Sync {
    /// Register `callback`. The provider delivers the current state exactly
    /// once (synchronously or later), then every change.
    fn on_identity_changed(&self, callback: IdentityCallback) -> ProviderSubscription;

    /// Sign the current user out.
    async fn sign_out(&self) -> Result<(), IdentityError>;

    /// Refresh the current user's record from the provider.
    async fn reload_current_user(&self) -> Result<Option<ProviderUser>, IdentityError>;

    /// Send (or re-send) the email-verification message.
    async fn send_email_verification(&self) -> Result<(), IdentityError>;

    /// Delete the signed-in account.
    async fn delete_current_user(&self) -> Result<(), IdentityError>;
}

#[async_trait]
impl<T: IdentityProviderEffects + ?Sized> IdentityProviderEffects for Arc<T> {
    fn on_identity_changed(&self, callback: IdentityCallback) -> ProviderSubscription {
        (**self).on_identity_changed(callback)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        (**self).sign_out().await
    }

    async fn reload_current_user(&self) -> Result<Option<ProviderUser>, IdentityError> {
        (**self).reload_current_user().await
    }

    async fn send_email_verification(&self) -> Result<(), IdentityError> {
        (**self).send_email_verification().await
    }

    async fn delete_current_user(&self) -> Result<(), IdentityError> {
        (**self).delete_current_user().await
    }
}
