//! Shared session harness for integration tests.

#![allow(dead_code)]

use kuusi_app::{AppSession, SessionConfig, SessionEffects};
use kuusi_testkit::{
    init_test_tracing, MemoryDocumentStore, MemoryFlagStorage, RecordingRouter,
    ScriptedIdentityProvider, SimulatedClock,
};
use std::sync::Arc;
use std::time::Duration;

pub const MINUTE_MS: u64 = 60_000;
pub const NOW_MS: u64 = 1_700_000_000_000;

/// A session wired to scripted collaborators.
pub struct Harness {
    pub identity: ScriptedIdentityProvider,
    pub store: MemoryDocumentStore,
    pub router: RecordingRouter,
    pub storage: Arc<MemoryFlagStorage>,
    pub clock: SimulatedClock,
    pub session: AppSession,
}

impl Harness {
    pub fn new(identity: ScriptedIdentityProvider, path: &str) -> Self {
        Self::with_flags(identity, path, &[])
    }

    pub fn with_flags(identity: ScriptedIdentityProvider, path: &str, flags: &[(&str, &str)]) -> Self {
        init_test_tracing();
        let store = MemoryDocumentStore::new();
        let router = RecordingRouter::at(path);
        let storage = Arc::new(MemoryFlagStorage::with_entries(flags.iter().copied()));
        let clock = SimulatedClock::new(NOW_MS);

        let effects = SessionEffects {
            flags: storage.clone(),
            identity: Arc::new(identity.clone()),
            store: Arc::new(store.clone()),
            router: Arc::new(router.clone()),
            clock: Arc::new(clock.clone()),
        };
        let session = AppSession::new(effects, SessionConfig::default()).unwrap();

        Self {
            identity,
            store,
            router,
            storage,
            clock,
            session,
        }
    }

    /// Replacement paths requested so far
    pub fn replaced_paths(&self) -> Vec<String> {
        self.router
            .replacements()
            .into_iter()
            .map(String::from)
            .collect()
    }
}

/// `lastActiveAt` value `minutes` before the harness clock.
pub fn minutes_ago(minutes: u64) -> String {
    (NOW_MS - minutes * MINUTE_MS).to_string()
}

/// Let spawned tasks run until they are idle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
