//! End-to-end session flows through `AppSession`.

mod common;

use common::{minutes_ago, settle, Harness, NOW_MS};
use kuusi_app::flags::LAST_ACTIVE_AT_KEY;
use kuusi_app::{AppLifecycleEvent, AppSession, ErrorCategory, SessionConfig, SessionEffects};
use kuusi_core::{IdentityError, Uid};
use kuusi_testkit::{
    unverified_user, verified_user, MemoryDocumentStore, MemoryFlagStorage, RecordingRouter,
    ScriptedIdentityProvider, SimulatedClock,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn fresh_install_to_home() {
    let h = Harness::new(ScriptedIdentityProvider::signed_out(), "/");
    let _guard = h.session.boot().await;
    settle().await;
    assert_eq!(h.router.path(), "/invite");

    let err = h.session.submit_invitation_code("Tampere").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Input);
    assert_eq!(h.router.path(), "/invite");

    h.session.submit_invitation_code("Helsinki").unwrap();
    settle().await;
    assert_eq!(h.router.path(), "/auth");

    // Sign-up creates an unverified account
    h.identity.emit(Some(unverified_user("u1")));
    settle().await;
    assert_eq!(h.router.path(), "/verify-email");

    h.session.resend_verification_email().await.unwrap();
    assert_eq!(h.identity.verification_emails(), 1);

    // Email confirmed in another tab; picked up by the poll
    h.identity.confirm_email_remotely();
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(h.router.path(), "/home");

    assert_eq!(
        h.replaced_paths(),
        vec!["/invite", "/auth", "/verify-email", "/home"]
    );
    assert!(h.session.flags().invitation_verified());
}

#[tokio::test(start_paused = true)]
async fn returning_verified_user_boots_home() {
    let h = Harness::with_flags(
        ScriptedIdentityProvider::signed_in(verified_user("u1")),
        "/",
        &[(LAST_ACTIVE_AT_KEY, minutes_ago(1).as_str())],
    );
    let _guard = h.session.boot().await;
    settle().await;
    assert_eq!(h.replaced_paths(), vec!["/home"]);
}

#[tokio::test(start_paused = true)]
async fn deep_link_after_inactivity_forces_sign_out() {
    let h = Harness::with_flags(
        ScriptedIdentityProvider::signed_in(verified_user("u1")),
        "/notifications",
        &[(LAST_ACTIVE_AT_KEY, minutes_ago(10).as_str())],
    );
    let _guard = h.session.boot().await;
    settle().await;
    assert_eq!(h.identity.sign_out_calls(), 1);
    assert_eq!(h.router.path(), "/auth");
}

#[tokio::test(start_paused = true)]
async fn deep_link_within_threshold_stays() {
    let h = Harness::with_flags(
        ScriptedIdentityProvider::signed_in(verified_user("u1")),
        "/notifications",
        &[(LAST_ACTIVE_AT_KEY, minutes_ago(3).as_str())],
    );
    let _guard = h.session.boot().await;
    settle().await;
    assert_eq!(h.identity.sign_out_calls(), 0);
    assert!(h.router.replacements().is_empty());
}

#[tokio::test(start_paused = true)]
async fn lifecycle_boundaries_feed_next_launch() {
    let h = Harness::new(ScriptedIdentityProvider::signed_in(verified_user("u1")), "/home");
    h.session.on_lifecycle(AppLifecycleEvent::Visible);
    assert!(h.session.flags().last_active_at().is_none());

    h.session.on_lifecycle(AppLifecycleEvent::Hidden);
    assert_eq!(h.session.flags().last_active_at(), Some(NOW_MS));

    h.clock.advance_ms(30_000);
    h.session.on_lifecycle(AppLifecycleEvent::BeforeUnload);
    assert_eq!(h.session.flags().last_active_at(), Some(NOW_MS + 30_000));

    h.clock.advance_ms(4 * 60_000);
    assert!(h.session.inactivity().is_expired());
}

#[tokio::test(start_paused = true)]
async fn restart_sign_up_returns_to_auth() {
    let h = Harness::new(
        ScriptedIdentityProvider::signed_in(unverified_user("u1")),
        "/verify-email",
    );
    let _guard = h.session.mount_guard();
    settle().await;

    h.session.restart_sign_up().await.unwrap();
    settle().await;

    assert!(h.store.is_user_deleted(&Uid::new("u1")));
    assert_eq!(h.identity.deleted_accounts(), 1);
    assert_eq!(h.router.path(), "/auth");

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.identity.reload_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn invalid_config_is_rejected() {
    let effects = SessionEffects {
        flags: Arc::new(MemoryFlagStorage::new()),
        identity: Arc::new(ScriptedIdentityProvider::signed_out()),
        store: Arc::new(MemoryDocumentStore::new()),
        router: Arc::new(RecordingRouter::at("/")),
        clock: Arc::new(SimulatedClock::new(NOW_MS)),
    };
    let config = SessionConfig {
        splash_delay_ms: 60_000,
        ..SessionConfig::default()
    };
    let err = AppSession::new(effects, config).err().unwrap();
    assert_eq!(err.category(), ErrorCategory::Config);
}

#[test]
fn restart_sign_up_lands_on_auth_in_every_interleaving() {
    for run in 0..40 {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let (path, replaced) = rt.block_on(async {
            let h = Harness::new(
                ScriptedIdentityProvider::signed_in(unverified_user("u1")),
                "/verify-email",
            );
            let _guard = h.session.mount_guard();
            settle().await;

            h.session.restart_sign_up().await.unwrap();
            settle().await;
            (h.router.path(), h.replaced_paths())
        });
        assert_eq!(path, "/auth", "run {run}: {replaced:?}");
        assert_eq!(replaced, vec!["/auth"], "run {run}");
    }
}

#[tokio::test(start_paused = true)]
async fn expired_session_stays_out_when_sign_out_fails() {
    let h = Harness::with_flags(
        ScriptedIdentityProvider::signed_in(verified_user("u1")),
        "/",
        &[(LAST_ACTIVE_AT_KEY, minutes_ago(10).as_str())],
    );
    h.identity.fail_sign_out(IdentityError::unavailable("offline"));

    let _guard = h.session.boot().await;
    settle().await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(h.identity.sign_out_calls(), 1);
    assert_eq!(h.replaced_paths(), vec!["/auth"]);
    assert!(h.session.watcher().is_holding_signed_out());

    // Opening a protected page does not revive the expired session
    h.router.navigate("/home");
    settle().await;
    assert_eq!(h.router.path(), "/auth");

    // Signing in again is a new session
    h.identity.emit(Some(verified_user("u1")));
    settle().await;
    assert_eq!(h.router.path(), "/home");
    assert!(!h.session.watcher().is_holding_signed_out());
}

#[tokio::test(start_paused = true)]
async fn expired_deep_link_stays_out_when_sign_out_fails() {
    let h = Harness::with_flags(
        ScriptedIdentityProvider::signed_in(verified_user("u1")),
        "/notifications",
        &[(LAST_ACTIVE_AT_KEY, minutes_ago(10).as_str())],
    );
    h.identity.fail_sign_out(IdentityError::unavailable("offline"));

    let _guard = h.session.boot().await;
    settle().await;
    assert_eq!(h.router.path(), "/auth");
    assert_eq!(h.replaced_paths(), vec!["/auth"]);
}
