//! Recording router.

use kuusi_core::effects::RouterEffects;
use kuusi_core::Location;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

/// Router double that records every replacement the core requests.
///
/// [`navigate`](Self::navigate) simulates the user (or a screen) moving to a
/// new location; it is not recorded as a replacement.
#[derive(Clone)]
pub struct RecordingRouter {
    location: watch::Sender<Location>,
    replacements: Arc<Mutex<Vec<Location>>>,
}

impl RecordingRouter {
    /// Router currently showing `path`
    pub fn at(path: &str) -> Self {
        let (location, _) = watch::channel(Location::new(path));
        Self {
            location,
            replacements: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Move to `path` as a user navigation would
    pub fn navigate(&self, path: &str) {
        self.location.send_replace(Location::new(path));
    }

    /// Every replacement requested so far, oldest first
    pub fn replacements(&self) -> Vec<Location> {
        self.replacements.lock().clone()
    }

    /// Current path as a string
    pub fn path(&self) -> String {
        self.location.borrow().as_str().to_string()
    }
}

impl RouterEffects for RecordingRouter {
    fn current_location(&self) -> Location {
        self.location.borrow().clone()
    }

    fn replace(&self, to: &Location) {
        self.replacements.lock().push(to.clone());
        self.location.send_replace(to.clone());
    }

    fn watch_location(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }
}
