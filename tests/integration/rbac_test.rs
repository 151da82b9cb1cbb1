//! Permission checks on the administrative routes.

use axum::http::StatusCode;
use serde_json::json;

use identity_database::CredentialStore;
use identity_entity::permission::names;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_customer_cannot_list_users() {
    let app = TestApp::new();
    app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (access, _) = app.tokens("carol", "laptop").await;

    let response = app.request("GET", "/api/users", None, Some(&access)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.str("error"), "FORBIDDEN");
}

#[tokio::test]
async fn test_admin_lists_users() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (access, _) = app.tokens("ada", "laptop").await;

    let response = app.request("GET", "/api/users", None, Some(&access)).await;
    assert_eq!(response.status, StatusCode::OK);

    let users = response.body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "ada");
    assert!(users.iter().all(|u| u.get("password_hash").is_none()));
}

#[tokio::test]
async fn test_role_granted_after_login_applies_immediately() {
    let app = TestApp::new();
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (access, _) = app.tokens("carol", "laptop").await;

    let before = app.request("GET", "/api/roles", None, Some(&access)).await;
    assert_eq!(before.status, StatusCode::FORBIDDEN);

    let admin = app.store.find_role_by_name(names::ROLE_ADMIN).await.unwrap().unwrap();
    app.store.assign_role(carol.id, admin.id).await.unwrap();

    let after = app.request("GET", "/api/roles", None, Some(&access)).await;
    assert_eq!(after.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_disables_user() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (admin_access, _) = app.tokens("ada", "laptop").await;
    let (carol_access, _) = app.tokens("carol", "phone").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}/enabled", carol.id),
            Some(json!({"enabled": false})),
            Some(&admin_access),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["enabled"], false);

    let login = app.login("carol", "phone").await;
    assert_eq!(login.status, StatusCode::UNPROCESSABLE_ENTITY);

    // An outstanding token no longer opens protected routes.
    let me = app.request("GET", "/api/users/me", None, Some(&carol_access)).await;
    assert_eq!(me.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_cannot_disable_user() {
    let app = TestApp::new();
    let ada = app.create_user("ada", names::ROLE_ADMIN).await;
    app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (access, _) = app.tokens("carol", "phone").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}/enabled", ada.id),
            Some(json!({"enabled": false})),
            Some(&access),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.store.find_by_id(ada.id).await.unwrap().unwrap().enabled);
}

#[tokio::test]
async fn test_admin_assigns_role_over_http() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (access, _) = app.tokens("ada", "laptop").await;
    let guest = app.store.find_role_by_name(names::ROLE_GUEST).await.unwrap().unwrap();

    let response = app
        .request(
            "POST",
            &format!("/api/users/{}/roles", carol.id),
            Some(json!({"role_id": guest.id})),
            Some(&access),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let roles: Vec<&str> = response.body["roles"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r.as_str())
        .collect();
    assert_eq!(roles, vec![names::ROLE_CUSTOMER, names::ROLE_GUEST]);

    let unknown = app
        .request(
            "POST",
            &format!("/api/users/{}/roles", carol.id),
            Some(json!({"role_id": 9999})),
            Some(&access),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_system_admin_sees_role_graph() {
    let app = TestApp::new();
    app.create_user("root", names::ROLE_SYSTEM_ADMIN).await;
    let (access, _) = app.tokens("root", "console").await;

    let roles = app.request("GET", "/api/roles", None, Some(&access)).await;
    assert_eq!(roles.status, StatusCode::OK);
    let roles = roles.body.as_array().unwrap().clone();
    assert_eq!(roles.len(), 4);
    assert_eq!(roles[0]["name"], names::ROLE_SYSTEM_ADMIN);
    assert_eq!(roles[0]["permissions"].as_array().unwrap().len(), 12);

    let permissions = app.request("GET", "/api/permissions", None, Some(&access)).await;
    assert_eq!(permissions.status, StatusCode::OK);
    assert_eq!(permissions.body.as_array().unwrap().len(), names::ALL.len());
}

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let (access, _) = app.tokens("ada", "laptop").await;

    let response = app
        .request(
            "GET",
            &format!("/api/users/{}", uuid::Uuid::new_v4()),
            None,
            Some(&access),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
