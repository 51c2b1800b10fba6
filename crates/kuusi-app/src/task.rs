//! Mounted background tasks.
//!
//! The splash resolver, navigation guard, and verification poller each run as
//! a spawned task tied to the lifetime of a handle. Dropping the handle (the
//! "unmount") clears the task's [`Liveness`] flag and aborts it, so no effect
//! is applied after unmount even on a multi-threaded runtime where abort is
//! only observed at the next await.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Shared "still mounted" flag handed to a mounted task.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether the owning handle is still mounted
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Handle to a task that is cancelled when the handle is dropped.
#[derive(Debug)]
pub struct MountedTask<T> {
    name: &'static str,
    liveness: Liveness,
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> MountedTask<T> {
    /// Spawn `make(liveness)` on the current runtime.
    pub fn spawn<F, Fut>(name: &'static str, make: F) -> Self
    where
        F: FnOnce(Liveness) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let liveness = Liveness::new();
        let handle = tokio::spawn(make(liveness.clone()));
        tracing::debug!(task = name, "Mounted");
        Self {
            name,
            liveness,
            handle: Some(handle),
        }
    }

    /// Whether the task has run to completion (or was aborted)
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the task's result. `None` if it was aborted or panicked.
    pub async fn join(mut self) -> Option<T> {
        let handle = self.handle.take()?;
        match handle.await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(task = self.name, error = %e, "Mounted task did not complete");
                None
            }
        }
    }

    /// Cancel the task now.
    pub fn unmount(self) {
        drop(self);
    }
}

impl<T> Drop for MountedTask<T> {
    fn drop(&mut self) {
        self.liveness.revoke();
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                tracing::debug!(task = self.name, "Unmounted");
            }
            handle.abort();
        }
    }
}
