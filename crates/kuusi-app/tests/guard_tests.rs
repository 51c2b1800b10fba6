//! Navigation guard behaviour against scripted collaborators.

mod common;

use common::{settle, Harness};
use kuusi_testkit::{unverified_user, verified_user, ScriptedIdentityProvider};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn signed_out_on_auth_only_route_goes_to_auth() {
    for path in ["/home", "/upload", "/user/change-password", "/browse-by-year", "/somewhere"] {
        let h = Harness::new(ScriptedIdentityProvider::signed_out(), path);
        let _guard = h.session.mount_guard();
        settle().await;
        assert_eq!(h.router.path(), "/auth", "from {path}");
        assert_eq!(h.replaced_paths(), vec!["/auth"]);
    }
}

#[tokio::test(start_paused = true)]
async fn signed_out_on_public_route_stays() {
    for path in ["/invite", "/auth", "/verify-email", "/group/join/G1"] {
        let h = Harness::new(ScriptedIdentityProvider::signed_out(), path);
        let _guard = h.session.mount_guard();
        settle().await;
        assert!(h.router.replacements().is_empty(), "{path}");
    }
}

#[tokio::test(start_paused = true)]
async fn verified_on_public_route_goes_home() {
    for path in ["/auth", "/invite", "/verify-email"] {
        let h = Harness::new(ScriptedIdentityProvider::signed_in(verified_user("u1")), path);
        let _guard = h.session.mount_guard();
        settle().await;
        assert_eq!(h.router.path(), "/home", "from {path}");
    }
}

#[tokio::test(start_paused = true)]
async fn verified_on_auth_only_route_stays() {
    let h = Harness::new(ScriptedIdentityProvider::signed_in(verified_user("u1")), "/notifications");
    let _guard = h.session.mount_guard();
    settle().await;
    assert!(h.router.replacements().is_empty());
}

#[tokio::test(start_paused = true)]
async fn unverified_is_held_on_verify_email() {
    let h = Harness::new(ScriptedIdentityProvider::signed_in(unverified_user("u1")), "/home");
    let _guard = h.session.mount_guard();
    settle().await;
    assert_eq!(h.router.path(), "/verify-email");

    h.router.navigate("/upload");
    settle().await;
    assert_eq!(h.router.path(), "/verify-email");
    assert_eq!(h.replaced_paths(), vec!["/verify-email", "/verify-email"]);
}

#[tokio::test(start_paused = true)]
async fn guard_waits_for_initial_resolution() {
    let identity = ScriptedIdentityProvider::signed_in(verified_user("u1"));
    identity.hold_initial_resolution();
    let h = Harness::new(identity, "/auth");
    let _guard = h.session.mount_guard();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.router.replacements().is_empty());

    h.identity.resolve_initial();
    settle().await;
    assert_eq!(h.router.path(), "/home");
}

#[tokio::test(start_paused = true)]
async fn guard_is_idempotent_across_reevaluation() {
    let h = Harness::new(ScriptedIdentityProvider::signed_out(), "/home");
    let _guard = h.session.mount_guard();
    settle().await;
    assert_eq!(h.replaced_paths(), vec!["/auth"]);

    // Same facts delivered again: no further transition
    h.identity.emit(None);
    h.router.navigate("/auth");
    settle().await;
    assert_eq!(h.replaced_paths(), vec!["/auth"]);
}

#[tokio::test(start_paused = true)]
async fn guard_follows_identity_changes() {
    let h = Harness::new(ScriptedIdentityProvider::signed_out(), "/auth");
    let _guard = h.session.mount_guard();
    settle().await;

    h.identity.emit(Some(verified_user("u1")));
    settle().await;
    assert_eq!(h.router.path(), "/home");

    h.identity.emit(None);
    settle().await;
    assert_eq!(h.router.path(), "/auth");
}

#[tokio::test(start_paused = true)]
async fn provider_failure_is_signed_out() {
    let identity = ScriptedIdentityProvider::failing(kuusi_core::IdentityError::unavailable("offline"));
    let h = Harness::new(identity, "/home");
    let _guard = h.session.mount_guard();
    settle().await;
    assert_eq!(h.router.path(), "/auth");
}

#[tokio::test(start_paused = true)]
async fn unmount_unsubscribes_and_stops_redirecting() {
    let h = Harness::new(ScriptedIdentityProvider::signed_out(), "/auth");
    let guard = h.session.mount_guard();
    settle().await;
    assert_eq!(h.identity.listener_count(), 1);

    guard.unmount();
    settle().await;
    assert_eq!(h.identity.listener_count(), 0);

    h.router.navigate("/home");
    h.identity.deliver_late(Ok(None));
    settle().await;
    assert_eq!(h.router.path(), "/home");
    assert!(h.router.replacements().is_empty());
}

#[tokio::test(start_paused = true)]
async fn verification_poll_promotes_to_home() {
    let h = Harness::new(ScriptedIdentityProvider::signed_in(unverified_user("u1")), "/verify-email");
    let _guard = h.session.mount_guard();
    settle().await;

    tokio::time::sleep(Duration::from_secs(7)).await;
    assert_eq!(h.identity.reload_calls(), 2);
    assert_eq!(h.router.path(), "/verify-email");

    h.identity.confirm_email_remotely();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(h.router.path(), "/home");

    // Polling ends once verified
    let calls = h.identity.reload_calls();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.identity.reload_calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn verification_poll_stops_on_unmount() {
    let h = Harness::new(ScriptedIdentityProvider::signed_in(unverified_user("u1")), "/verify-email");
    let guard = h.session.mount_guard();
    tokio::time::sleep(Duration::from_millis(3_100)).await;
    assert_eq!(h.identity.reload_calls(), 1);

    guard.unmount();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.identity.reload_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn verification_poll_stops_on_sign_out() {
    let h = Harness::new(ScriptedIdentityProvider::signed_in(unverified_user("u1")), "/verify-email");
    let _guard = h.session.mount_guard();
    settle().await;

    h.identity.emit(None);
    settle().await;
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.identity.reload_calls(), 0);
    assert_eq!(h.router.path(), "/verify-email");
}

#[test]
fn queued_identity_change_is_seen_before_location_change() {
    // Fresh runtimes so the scheduler gets many chances to pick an ordering
    for run in 0..40 {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let (path, replaced) = rt.block_on(async {
            let h = Harness::new(
                ScriptedIdentityProvider::signed_in(verified_user("u1")),
                "/notifications",
            );
            let _guard = h.session.mount_guard();
            settle().await;

            // Both facts change before the guard runs again
            h.identity.emit(None);
            h.router.navigate("/invite");
            settle().await;
            (h.router.path(), h.replaced_paths())
        });
        assert_eq!(path, "/invite", "run {run}: {replaced:?}");
        assert!(replaced.is_empty(), "run {run}: {replaced:?}");
    }
}
