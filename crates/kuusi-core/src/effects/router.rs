//! Client-side router interface.

use crate::location::Location;
use std::sync::Arc;
use tokio::sync::watch;

/// Router operations used by the session core.
///
/// The core never pushes history entries; every transition it requests is a
/// replacement, so redirects are not back-navigable.
pub trait RouterEffects: Send + Sync {
    /// The location currently rendered.
    fn current_location(&self) -> Location;

    /// Replace the current history entry with `to`.
    fn replace(&self, to: &Location);

    /// Observe location changes, including ones this core requested.
    fn watch_location(&self) -> watch::Receiver<Location>;
}

impl<T: RouterEffects + ?Sized> RouterEffects for Arc<T> {
    fn current_location(&self) -> Location {
        (**self).current_location()
    }

    fn replace(&self, to: &Location) {
        (**self).replace(to);
    }

    fn watch_location(&self) -> watch::Receiver<Location> {
        (**self).watch_location()
    }
}
