//! Wall-clock time.
//!
//! Only timestamps that must survive a reload (`lastActiveAt`) read the wall
//! clock. Delays and poll intervals use `tokio::time` directly, which tests
//! pause and advance.

use std::sync::Arc;

/// Wall-clock source.
pub trait PhysicalTimeEffects: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

impl<T: PhysicalTimeEffects + ?Sized> PhysicalTimeEffects for Arc<T> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
