use nexora_session::auth::{AuthError, DemoVerifier};
use nexora_session::gate::{Decision, Redirect, RouteTable};
use nexora_session::models::RoutePaths;
use nexora_session::security::sanitize_for_display;
use nexora_session::session::{
    ActivityTracker, InactivityMonitor, InteractionKind, SESSION_TIMEOUT, SessionConfig,
    SessionStore, scope,
};
use nexora_session::storage::{BrowserStorage, MemoryBrowserStorage, StorageArea};
use std::sync::Arc;
use std::time::Duration;

fn portal() -> (SessionStore, MemoryBrowserStorage, RouteTable) {
    let storage = MemoryBrowserStorage::new();
    let store = SessionStore::new(
        Arc::new(DemoVerifier),
        Arc::new(storage.clone()),
        SessionConfig::default(),
    );
    (store, storage, RouteTable::portal(RoutePaths::default()))
}

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// A patient signs in, browses, and is bounced away from the doctor area
#[tokio::test]
async fn test_patient_journey() {
    let (store, _, routes) = portal();

    assert_eq!(
        routes.resolve(store.current().as_ref(), "/medications"),
        Some(Decision::Redirect(Redirect::to("/").with_return_to("/medications")))
    );

    let identity = store.login("pat@example.com", "pw", "patient").await.unwrap();
    assert_eq!(RoutePaths::default().home_for(identity.role), "/dashboard");

    let current = store.current();
    assert_eq!(routes.resolve(current.as_ref(), "/dashboard"), Some(Decision::Render));
    assert_eq!(routes.resolve(current.as_ref(), "/medications"), Some(Decision::Render));
    assert_eq!(
        routes.resolve(current.as_ref(), "/doctor"),
        Some(Decision::redirect("/dashboard"))
    );
}

/// A doctor may use shared views but never patient-only ones
#[tokio::test]
async fn test_doctor_journey() {
    let (store, _, routes) = portal();

    let identity = store.login("doc@example.com", "pw", "doctor").await.unwrap();
    assert_eq!(RoutePaths::default().home_for(identity.role), "/doctor");

    let current = store.current();
    assert_eq!(routes.resolve(current.as_ref(), "/doctor"), Some(Decision::Render));
    assert_eq!(routes.resolve(current.as_ref(), "/analytics"), Some(Decision::Render));
    assert_eq!(
        routes.resolve(current.as_ref(), "/dashboard"),
        Some(Decision::redirect("/doctor"))
    );
    assert_eq!(
        routes.resolve(current.as_ref(), "/symptom-checker"),
        Some(Decision::redirect("/doctor"))
    );
}

#[tokio::test]
async fn test_rejected_role_keeps_views_locked() {
    let (store, _, routes) = portal();

    let err = store
        .register("Mallory", "m@example.com", "pw", "admin")
        .await
        .unwrap_err();
    assert_eq!(err, AuthError::InvalidRole("admin".to_string()));

    assert_eq!(
        routes
            .resolve(store.current().as_ref(), "/doctor")
            .and_then(|d| d.redirect_target().map(str::to_string)),
        Some("/login".to_string())
    );
}

#[tokio::test]
async fn test_logout_purges_storage_and_locks_views() {
    let (store, storage, routes) = portal();
    store.login("pat@example.com", "pw", "patient").await.unwrap();

    storage
        .set_item(StorageArea::Durable, "nexora_token", "abc")
        .await
        .unwrap();
    storage
        .set_item(StorageArea::Tab, "nexora_user", "{}")
        .await
        .unwrap();

    assert!(store.logout().await);
    assert!(!store.logout().await);

    assert!(storage.is_empty().await);
    assert_eq!(
        routes.resolve(store.current().as_ref(), "/devices"),
        Some(Decision::Redirect(Redirect::to("/").with_return_to("/devices")))
    );
}

/// Idle user is signed out and the next navigation is redirected
#[tokio::test(start_paused = true)]
async fn test_idle_session_expires() {
    let (store, _, routes) = portal();
    let tracker = ActivityTracker::new();
    let monitor = InactivityMonitor::attach(store.clone(), tracker.clone());

    store.login("doc@example.com", "pw", "doctor").await.unwrap();
    settle().await;

    tokio::time::sleep(Duration::from_secs(10 * 60)).await;
    tracker.record(InteractionKind::Scroll);
    settle().await;

    // 15 minutes after sign-in, but only 5 after the scroll
    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    assert!(store.is_doctor());

    tokio::time::sleep(SESSION_TIMEOUT).await;
    settle().await;
    assert!(!store.is_authenticated());
    assert_eq!(
        routes.resolve(store.current().as_ref(), "/doctor"),
        Some(Decision::redirect("/login"))
    );

    monitor.detach();
}

#[tokio::test]
async fn test_views_reach_store_through_scope() {
    let (store, _, _) = portal();

    let is_patient = store
        .scope(async {
            let session = scope::current();
            session
                .login("pat@example.com", "pw", "patient")
                .await
                .unwrap();
            session.is_patient()
        })
        .await;

    assert!(is_patient);
    assert!(store.is_patient());
}

#[tokio::test]
async fn test_registered_name_is_escaped_for_display() {
    let (store, _, _) = portal();

    let identity = store
        .register("<script>alert(1)</script> & friends", "x@example.com", "pw", "patient")
        .await
        .unwrap();

    let html = identity.display_name_html();
    assert_eq!(html, sanitize_for_display(&identity.display_name));
    assert!(!html.contains('<'));
    assert!(!html.contains('>'));
    assert!(html.contains("&amp; friends"));
}
