//! Splash resolver: delay, inactivity, identity, invitation flag.

mod common;

use common::{minutes_ago, settle, Harness};
use kuusi_app::flags::{INVITATION_VERIFIED_KEY, LAST_ACTIVE_AT_KEY};
use kuusi_app::SplashDestination;
use kuusi_testkit::{unverified_user, verified_user, ScriptedIdentityProvider};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn fresh_device_goes_to_invite() {
    let h = Harness::new(ScriptedIdentityProvider::signed_out(), "/");
    let destination = h.session.mount_splash().join().await;
    assert_eq!(destination, Some(Some(SplashDestination::Invite)));
    assert_eq!(h.replaced_paths(), vec!["/invite"]);
}

#[tokio::test(start_paused = true)]
async fn accepted_invitation_goes_to_auth() {
    let h = Harness::with_flags(
        ScriptedIdentityProvider::signed_out(),
        "/",
        &[(INVITATION_VERIFIED_KEY, "true")],
    );
    assert_eq!(h.session.splash().run().await, SplashDestination::Auth);
    assert_eq!(h.replaced_paths(), vec!["/auth"]);
}

#[tokio::test(start_paused = true)]
async fn signed_in_goes_home_even_if_unverified() {
    for user in [verified_user("u1"), unverified_user("u2")] {
        let h = Harness::new(ScriptedIdentityProvider::signed_in(user), "/");
        assert_eq!(h.session.splash().run().await, SplashDestination::Home);
        assert_eq!(h.replaced_paths(), vec!["/home"]);
    }
}

#[tokio::test(start_paused = true)]
async fn decision_waits_for_display_delay() {
    let h = Harness::new(ScriptedIdentityProvider::signed_out(), "/");
    let splash = h.session.mount_splash();

    tokio::time::sleep(Duration::from_millis(1_900)).await;
    assert!(h.router.replacements().is_empty());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(h.router.path(), "/invite");
    assert!(splash.is_finished());
}

#[tokio::test(start_paused = true)]
async fn expired_session_signs_out_before_reading_identity() {
    let identity = ScriptedIdentityProvider::signed_in(verified_user("u1"));
    // Identity never resolves: the splash must not need it
    identity.hold_initial_resolution();
    let h = Harness::with_flags(identity, "/", &[(LAST_ACTIVE_AT_KEY, minutes_ago(4).as_str())]);

    assert_eq!(h.session.splash().run().await, SplashDestination::Auth);
    assert_eq!(h.identity.sign_out_calls(), 1);
    assert_eq!(h.replaced_paths(), vec!["/auth"]);
}

#[tokio::test(start_paused = true)]
async fn recent_session_is_kept() {
    let h = Harness::with_flags(
        ScriptedIdentityProvider::signed_in(verified_user("u1")),
        "/",
        &[(LAST_ACTIVE_AT_KEY, minutes_ago(2).as_str())],
    );
    assert_eq!(h.session.splash().run().await, SplashDestination::Home);
    assert_eq!(h.identity.sign_out_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn late_identity_resolution_is_awaited() {
    let identity = ScriptedIdentityProvider::signed_in(verified_user("u1"));
    identity.hold_initial_resolution();
    let h = Harness::new(identity, "/");
    let splash = h.session.mount_splash();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.router.replacements().is_empty());

    h.identity.resolve_initial();
    assert_eq!(splash.join().await, Some(Some(SplashDestination::Home)));
    assert_eq!(h.replaced_paths(), vec!["/home"]);
}

#[tokio::test(start_paused = true)]
async fn unmount_before_delay_cancels_navigation() {
    let h = Harness::new(ScriptedIdentityProvider::signed_in(verified_user("u1")), "/");
    let splash = h.session.mount_splash();
    settle().await;
    assert_eq!(h.identity.listener_count(), 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    splash.unmount();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(h.router.replacements().is_empty());
    assert_eq!(h.identity.listener_count(), 0);
    assert_eq!(h.router.path(), "/");
}
