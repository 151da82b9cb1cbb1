//! Administrative user management and password changes.

use axum::http::StatusCode;
use serde_json::{Value, json};

use identity_database::CredentialStore;
use identity_entity::permission::names;

use crate::helpers::{PASSWORD, TestApp, email};

const NEW_PASSWORD: &str = "Lantern-orbit-77-kelp";

fn user_body(username: &str, roles: Value) -> Value {
    json!({
        "username": username,
        "firstname": "Fox",
        "lastname": "Mulder",
        "email": email(username),
        "password": PASSWORD,
        "roles": roles,
    })
}

async fn login_with(app: &TestApp, username: &str, password: &str) -> StatusCode {
    app.request(
        "POST",
        "/api/auth/login",
        Some(json!({
            "email": email(username),
            "password": password,
            "device_id": "laptop",
        })),
        None,
    )
    .await
    .status
}

#[tokio::test]
async fn test_admin_creates_user_with_roles() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let (admin, _) = app.tokens("ada", "laptop").await;
    let guest = app
        .store
        .find_role_by_name(names::ROLE_GUEST)
        .await
        .unwrap()
        .unwrap();

    let response = app
        .request("POST", "/api/users", Some(user_body("fox", json!([guest.id]))), Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["roles"], json!([names::ROLE_GUEST]));
    assert_eq!(login_with(&app, "fox", PASSWORD).await, StatusCode::OK);
}

#[tokio::test]
async fn test_create_user_with_unknown_role_creates_nothing() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let (admin, _) = app.tokens("ada", "laptop").await;

    let response = app
        .request("POST", "/api/users", Some(user_body("fox", json!([9999]))), Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.store.find_by_email(&email("fox")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_customer_cannot_manage_users() {
    let app = TestApp::new();
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let ada = app.create_user("ada", names::ROLE_ADMIN).await;
    let (access, _) = app.tokens("carol", "phone").await;

    let create = app
        .request("POST", "/api/users", Some(user_body("fox", json!([]))), Some(&access))
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);

    let delete = app
        .request("DELETE", &format!("/api/users/{}", ada.id), None, Some(&access))
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let password = app
        .request(
            "PUT",
            &format!("/api/users/{}/password", ada.id),
            Some(json!({"password": NEW_PASSWORD})),
            Some(&access),
        )
        .await;
    assert_eq!(password.status, StatusCode::FORBIDDEN);
    assert_eq!(login_with(&app, "ada", PASSWORD).await, StatusCode::OK);
    assert!(app.store.find_by_id(carol.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_update_user_email_conflict_ignores_case() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (admin, _) = app.tokens("ada", "laptop").await;

    let taken = app
        .request(
            "PUT",
            &format!("/api/users/{}", carol.id),
            Some(json!({
                "username": "carol",
                "firstname": "Carol",
                "lastname": "Danvers",
                "email": "ADA@example.com",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let updated = app
        .request(
            "PUT",
            &format!("/api/users/{}", carol.id),
            Some(json!({
                "username": "carol",
                "firstname": "Carol",
                "lastname": "Danvers",
                "email": "carol.danvers@example.com",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.str("email"), "carol.danvers@example.com");
    assert_eq!(updated.str("lastname"), "Danvers");
}

#[tokio::test]
async fn test_deleted_user_token_stops_working() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (admin, _) = app.tokens("ada", "laptop").await;
    let (access, _) = app.tokens("carol", "phone").await;

    let deleted = app
        .request("DELETE", &format!("/api/users/{}", carol.id), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = app
        .request("DELETE", &format!("/api/users/{}", carol.id), None, Some(&admin))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let me = app.request("GET", "/api/users/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_changes_own_password() {
    let app = TestApp::new();
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (access, _) = app.tokens("carol", "phone").await;

    let weak = app
        .request(
            "PUT",
            &format!("/api/users/{}/password", carol.id),
            Some(json!({"password": "carol"})),
            Some(&access),
        )
        .await;
    assert_eq!(weak.status, StatusCode::UNPROCESSABLE_ENTITY);

    let changed = app
        .request(
            "PUT",
            &format!("/api/users/{}/password", carol.id),
            Some(json!({"password": NEW_PASSWORD})),
            Some(&access),
        )
        .await;
    assert_eq!(changed.status, StatusCode::NO_CONTENT);

    assert_eq!(login_with(&app, "carol", NEW_PASSWORD).await, StatusCode::OK);
    assert_ne!(login_with(&app, "carol", PASSWORD).await, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_resets_other_password() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (admin, _) = app.tokens("ada", "laptop").await;

    let changed = app
        .request(
            "PUT",
            &format!("/api/users/{}/password", carol.id),
            Some(json!({"password": NEW_PASSWORD})),
            Some(&admin),
        )
        .await;
    assert_eq!(changed.status, StatusCode::NO_CONTENT);
    assert_eq!(login_with(&app, "carol", NEW_PASSWORD).await, StatusCode::OK);
}

#[tokio::test]
async fn test_unlock_needs_its_own_permission() {
    let app = TestApp::new();
    let keeper = app.create_user("keeper", names::ROLE_CUSTOMER).await;
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let doorman = app.store.add_role("Doorman", "Locks accounts", &[names::USERS_ACTIVATE]);
    app.store.assign_role(keeper.id, doorman.id).await.unwrap();
    let (access, _) = app.tokens("keeper", "laptop").await;
    let path = format!("/api/users/{}/enabled", carol.id);

    let locked = app
        .request("PUT", &path, Some(json!({"enabled": false})), Some(&access))
        .await;
    assert_eq!(locked.status, StatusCode::OK);

    let unlocked = app
        .request("PUT", &path, Some(json!({"enabled": true})), Some(&access))
        .await;
    assert_eq!(unlocked.status, StatusCode::FORBIDDEN);
    assert!(!app.store.find_by_id(carol.id).await.unwrap().unwrap().enabled);
}
