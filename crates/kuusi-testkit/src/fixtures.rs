//! Common fixtures.

use kuusi_core::{GroupId, GroupRecord, ProviderUser, Uid};

/// A signed-in user whose email is confirmed.
pub fn verified_user(uid: &str) -> ProviderUser {
    ProviderUser::new(uid, format!("{uid}@example.com"), true)
}

/// A signed-in user whose email is not yet confirmed.
pub fn unverified_user(uid: &str) -> ProviderUser {
    ProviderUser::new(uid, format!("{uid}@example.com"), false)
}

/// Parse a group id, panicking on invalid input.
pub fn group_id(id: &str) -> GroupId {
    GroupId::parse(id).expect("valid group id")
}

/// A group record with the given members.
pub fn group(id: &str, members: &[&str]) -> GroupRecord {
    GroupRecord::new(group_id(id), format!("Group {id}"))
        .with_members(members.iter().map(|m| Uid::new(*m)))
}

/// Install a test-writer tracing subscriber. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
