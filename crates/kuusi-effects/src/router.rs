//! Headless router

use kuusi_core::effects::RouterEffects;
use kuusi_core::Location;
use tokio::sync::watch;

/// Router with no view layer: holds the current location and logs every
/// replacement.
#[derive(Debug, Clone)]
pub struct HeadlessRouter {
    location: watch::Sender<Location>,
}

impl HeadlessRouter {
    /// Router starting at `path`
    pub fn new(path: &str) -> Self {
        let (location, _) = watch::channel(Location::new(path));
        Self { location }
    }
}

impl Default for HeadlessRouter {
    fn default() -> Self {
        Self::new("/")
    }
}

impl RouterEffects for HeadlessRouter {
    fn current_location(&self) -> Location {
        self.location.borrow().clone()
    }

    fn replace(&self, to: &Location) {
        let from = self.location.send_replace(to.clone());
        tracing::info!(from = %from, to = %to, "Route replaced");
    }

    fn watch_location(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }
}
