//! Scripted identity provider.

use async_trait::async_trait;
use kuusi_core::effects::{IdentityCallback, IdentityProviderEffects, ProviderSubscription};
use kuusi_core::{IdentityError, ProviderUser};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

type Report = Result<Option<ProviderUser>, IdentityError>;
type SharedCallback = Arc<IdentityCallback>;

#[derive(Default)]
struct Inner {
    /// State last delivered to listeners
    current: Option<ProviderUser>,
    /// Provider-side truth returned by `reload_current_user`
    remote: Option<ProviderUser>,
    initial_error: Option<IdentityError>,
    sign_out_error: Option<IdentityError>,
    hold_initial: bool,
    next_id: u64,
    listeners: BTreeMap<u64, SharedCallback>,
    awaiting_initial: Vec<u64>,
    detached: Vec<SharedCallback>,
    sign_out_calls: usize,
    reload_calls: usize,
    verification_emails: usize,
    deleted_accounts: usize,
}

/// Identity provider driven by the test.
///
/// Listeners receive the current state on subscription unless
/// [`hold_initial_resolution`](Self::hold_initial_resolution) is set, in
/// which case delivery waits for [`resolve_initial`](Self::resolve_initial).
/// Detached listeners are kept so [`deliver_late`](Self::deliver_late) can
/// replay callbacks that a real provider may still fire after unsubscribe.
#[derive(Clone, Default)]
pub struct ScriptedIdentityProvider {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedIdentityProvider {
    /// Provider with nobody signed in
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Provider with `user` already signed in
    pub fn signed_in(user: ProviderUser) -> Self {
        let provider = Self::default();
        {
            let mut inner = provider.inner.lock();
            inner.current = Some(user.clone());
            inner.remote = Some(user);
        }
        provider
    }

    /// Provider whose initial resolution fails
    pub fn failing(error: IdentityError) -> Self {
        let provider = Self::default();
        provider.inner.lock().initial_error = Some(error);
        provider
    }

    /// Make every `sign_out` call fail with `error`, leaving the user signed in
    pub fn fail_sign_out(&self, error: IdentityError) {
        self.inner.lock().sign_out_error = Some(error);
    }

    /// Defer initial delivery to new listeners until `resolve_initial`
    pub fn hold_initial_resolution(&self) {
        self.inner.lock().hold_initial = true;
    }

    /// Deliver the current state to listeners still awaiting it
    pub fn resolve_initial(&self) {
        let (targets, report) = {
            let mut inner = self.inner.lock();
            inner.hold_initial = false;
            let ids = std::mem::take(&mut inner.awaiting_initial);
            let targets: Vec<_> = ids
                .iter()
                .filter_map(|id| inner.listeners.get(id).cloned())
                .collect();
            (targets, initial_report(&inner))
        };
        for callback in targets {
            callback(report.clone());
        }
    }

    /// Change identity and notify every attached listener
    pub fn emit(&self, user: Option<ProviderUser>) {
        let targets = {
            let mut inner = self.inner.lock();
            inner.current = user.clone();
            inner.remote = user.clone();
            inner.initial_error = None;
            inner.listeners.values().cloned().collect::<Vec<_>>()
        };
        for callback in targets {
            callback(Ok(user.clone()));
        }
    }

    /// Deliver a report to listeners that have already unsubscribed
    pub fn deliver_late(&self, report: Report) {
        let targets = self.inner.lock().detached.clone();
        for callback in targets {
            callback(report.clone());
        }
    }

    /// Confirm the current user's email on the provider side without
    /// notifying listeners; visible only through `reload_current_user`
    pub fn confirm_email_remotely(&self) {
        if let Some(user) = self.inner.lock().remote.as_mut() {
            user.email_verified = true;
        }
    }

    /// Number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    /// Number of `sign_out` calls
    pub fn sign_out_calls(&self) -> usize {
        self.inner.lock().sign_out_calls
    }

    /// Number of `reload_current_user` calls
    pub fn reload_calls(&self) -> usize {
        self.inner.lock().reload_calls
    }

    /// Number of verification emails sent
    pub fn verification_emails(&self) -> usize {
        self.inner.lock().verification_emails
    }

    /// Number of deleted accounts
    pub fn deleted_accounts(&self) -> usize {
        self.inner.lock().deleted_accounts
    }
}

fn initial_report(inner: &Inner) -> Report {
    match &inner.initial_error {
        Some(error) => Err(error.clone()),
        None => Ok(inner.current.clone()),
    }
}

#[async_trait]
impl IdentityProviderEffects for ScriptedIdentityProvider {
    fn on_identity_changed(&self, callback: IdentityCallback) -> ProviderSubscription {
        let callback: SharedCallback = Arc::new(callback);
        let (id, deliver_now) = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.insert(id, callback.clone());
            if inner.hold_initial {
                inner.awaiting_initial.push(id);
                (id, None)
            } else {
                (id, Some(initial_report(&inner)))
            }
        };

        if let Some(report) = deliver_now {
            callback(report);
        }

        let inner = self.inner.clone();
        ProviderSubscription::new(move || {
            let mut inner = inner.lock();
            if let Some(callback) = inner.listeners.remove(&id) {
                inner.detached.push(callback);
            }
            inner.awaiting_initial.retain(|pending| *pending != id);
        })
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        {
            let mut inner = self.inner.lock();
            inner.sign_out_calls += 1;
            if let Some(error) = inner.sign_out_error.clone() {
                return Err(error);
            }
        }
        self.emit(None);
        Ok(())
    }

    async fn reload_current_user(&self) -> Result<Option<ProviderUser>, IdentityError> {
        let mut inner = self.inner.lock();
        inner.reload_calls += 1;
        Ok(inner.remote.clone())
    }

    async fn send_email_verification(&self) -> Result<(), IdentityError> {
        let mut inner = self.inner.lock();
        if inner.current.is_none() {
            return Err(IdentityError::NoCurrentUser);
        }
        inner.verification_emails += 1;
        Ok(())
    }

    async fn delete_current_user(&self) -> Result<(), IdentityError> {
        {
            let mut inner = self.inner.lock();
            if inner.current.is_none() {
                return Err(IdentityError::NoCurrentUser);
            }
            inner.deleted_accounts += 1;
        }
        self.emit(None);
        Ok(())
    }
}
