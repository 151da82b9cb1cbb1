//! Login, refresh and logout over HTTP.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use identity_auth::AccessTokenClaims;
use identity_database::CredentialStore;
use identity_entity::permission::names;

use crate::helpers::{PASSWORD, TestApp, email};

#[tokio::test]
async fn test_login_returns_token_pair() {
    let app = TestApp::new();
    app.create_user("alice", names::ROLE_CUSTOMER).await;

    let response = app.login("alice", "laptop").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.str("access_token").is_empty());
    assert_eq!(response.str("refresh_token").len(), 64);
    assert_eq!(response.str("device_id"), "laptop");
    assert!(response.body["expiry_date"].as_i64().unwrap() > Utc::now().timestamp());
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = TestApp::new();
    app.create_user("alice", names::ROLE_CUSTOMER).await;

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"email": email("alice"), "password": "nope", "device_id": "d"})),
            None,
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"email": email("mallory"), "password": PASSWORD, "device_id": "d"})),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_disabled_user_cannot_login() {
    let app = TestApp::new();
    let alice = app.create_user("alice", names::ROLE_CUSTOMER).await;
    app.store.set_enabled(alice.id, false, alice.id).await.unwrap();

    let response = app.login("alice", "laptop").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.str("error"), "ACCOUNT_LOCKED");
}

#[tokio::test]
async fn test_login_then_refresh() {
    let app = TestApp::new();
    app.create_user("alice", names::ROLE_CUSTOMER).await;
    let (access, refresh) = app.tokens("alice", "laptop").await;

    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": refresh})),
            Some(&access),
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let new_access = refreshed.str("access_token");
    let new_refresh = refreshed.str("refresh_token");
    assert_ne!(new_access, access);
    assert_ne!(new_refresh, refresh);
    assert_eq!(refreshed.str("device_id"), "laptop");

    // The superseded access token is revoked, the new one works.
    let old = app.request("GET", "/api/users/me", None, Some(&access)).await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    let me = app.request("GET", "/api/users/me", None, Some(&new_access)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.str("username"), "alice");

    // The superseded refresh secret is single-use.
    let replay = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": refresh})),
            Some(&new_access),
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(replay.str("error"), "REFRESH_TOKEN_INVALID");
}

#[tokio::test]
async fn test_second_login_on_same_device_replaces_session() {
    let app = TestApp::new();
    app.create_user("alice", names::ROLE_CUSTOMER).await;
    let (_, first_refresh) = app.tokens("alice", "phone").await;
    let (access, second_refresh) = app.tokens("alice", "phone").await;

    let stale = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": first_refresh})),
            Some(&access),
        )
        .await;
    assert_eq!(stale.status, StatusCode::UNPROCESSABLE_ENTITY);

    let fresh = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": second_refresh})),
            Some(&access),
        )
        .await;
    assert_eq!(fresh.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new();
    app.create_user("alice", names::ROLE_CUSTOMER).await;
    let (access, refresh) = app.tokens("alice", "tablet").await;

    let logout = app
        .request(
            "POST",
            "/api/auth/logout",
            Some(json!({"device_id": "tablet"})),
            Some(&access),
        )
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let me = app.request("GET", "/api/users/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
    assert_eq!(me.str("message"), "Unauthorized");

    // A fresh login works, but the closed session's secret is gone.
    let (new_access, _) = app.tokens("alice", "desktop").await;
    let refresh_closed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": refresh})),
            Some(&new_access),
        )
        .await;
    assert_eq!(refresh_closed.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_logout_does_not_affect_other_principal() {
    let app = TestApp::new();
    app.create_user("alice", names::ROLE_CUSTOMER).await;
    app.create_user("bob", names::ROLE_CUSTOMER).await;
    let (alice_access, _) = app.tokens("alice", "a-laptop").await;
    let (bob_access, _) = app.tokens("bob", "b-laptop").await;

    app.request(
        "POST",
        "/api/auth/logout",
        Some(json!({"device_id": "a-laptop"})),
        Some(&alice_access),
    )
    .await;

    let bob = app.request("GET", "/api/users/me", None, Some(&bob_access)).await;
    assert_eq!(bob.status, StatusCode::OK);
}

#[tokio::test]
async fn test_revocation_slot_is_per_principal() {
    // Revocation remembers only the latest revoked token of each principal,
    // not one per device. Revoking a second token releases the first.
    let app = TestApp::new();
    app.create_user("alice", names::ROLE_CUSTOMER).await;
    let (laptop_access, _) = app.tokens("alice", "laptop").await;
    let (phone_access, phone_refresh) = app.tokens("alice", "phone").await;

    app.request(
        "POST",
        "/api/auth/logout",
        Some(json!({"device_id": "laptop"})),
        Some(&laptop_access),
    )
    .await;
    let revoked = app.request("GET", "/api/users/me", None, Some(&laptop_access)).await;
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);

    let refreshed = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": phone_refresh})),
            Some(&phone_access),
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);

    let released = app.request("GET", "/api/users/me", None, Some(&laptop_access)).await;
    assert_eq!(released.status, StatusCode::OK);
    let phone = app.request("GET", "/api/users/me", None, Some(&phone_access)).await;
    assert_eq!(phone.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_accepted_from_query_parameter() {
    let app = TestApp::new();
    app.create_user("alice", names::ROLE_CUSTOMER).await;
    let (access, _) = app.tokens("alice", "laptop").await;

    let me = app
        .request("GET", &format!("/api/users/me?token={access}"), None, None)
        .await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_failures_are_generic() {
    let app = TestApp::new();
    let alice = app.create_user("alice", names::ROLE_CUSTOMER).await;

    let expired = app
        .codec
        .issue_until(
            AccessTokenClaims::for_principal(&alice),
            Utc::now() - Duration::minutes(1),
        )
        .unwrap()
        .token;
    let foreign = identity_auth::TokenCodec::from_secret(b"someone-else")
        .issue(AccessTokenClaims::for_principal(&alice), std::time::Duration::from_secs(60))
        .unwrap()
        .token;

    let mut bodies = Vec::new();
    for token in [expired.as_str(), foreign.as_str(), "garbage"] {
        let response = app.request("GET", "/api/users/me", None, Some(token)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        bodies.push(response.body);
    }
    assert!(bodies.iter().all(|b| *b == bodies[0]));

    let missing = app.request("GET", "/api/users/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
}
