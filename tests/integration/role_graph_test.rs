//! Role and permission management over HTTP.

use axum::http::StatusCode;
use serde_json::json;

use identity_database::CredentialStore;
use identity_entity::permission::names;

use crate::helpers::TestApp;

async fn permission_id(app: &TestApp, name: &str) -> i64 {
    let permissions = app.store.list_permissions().await.unwrap();
    permissions.iter().find(|p| p.name == name).unwrap().id as i64
}

#[tokio::test]
async fn test_granted_permission_takes_effect_and_withdraws() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let carol = app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (admin, _) = app.tokens("ada", "laptop").await;
    let (access, _) = app.tokens("carol", "phone").await;

    let created = app
        .request(
            "POST",
            "/api/roles",
            Some(json!({"name": "Auditor", "description": "Reads users"})),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let role_id = created.body["id"].as_i64().unwrap();

    let view = permission_id(&app, names::USERS_VIEW).await;
    let granted = app
        .request(
            "POST",
            &format!("/api/roles/{role_id}/permissions"),
            Some(json!({"permissions": [view]})),
            Some(&admin),
        )
        .await;
    assert_eq!(granted.status, StatusCode::OK);
    assert_eq!(granted.body["permissions"], json!([names::USERS_VIEW]));

    let assigned = app
        .request(
            "POST",
            &format!("/api/users/{}/roles", carol.id),
            Some(json!({"role_id": role_id})),
            Some(&admin),
        )
        .await;
    assert_eq!(assigned.status, StatusCode::OK);

    let list = app.request("GET", "/api/users", None, Some(&access)).await;
    assert_eq!(list.status, StatusCode::OK);

    let withdrawn = app
        .request(
            "DELETE",
            &format!("/api/roles/{role_id}/permissions/{view}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(withdrawn.status, StatusCode::NO_CONTENT);

    // The same access token loses the permission on its next request.
    let list = app.request("GET", "/api/users", None, Some(&access)).await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_grant_with_unknown_permission_grants_nothing() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let (admin, _) = app.tokens("ada", "laptop").await;
    let guest = app
        .store
        .find_role_by_name(names::ROLE_GUEST)
        .await
        .unwrap()
        .unwrap();
    let view = permission_id(&app, names::USERS_VIEW).await;

    let response = app
        .request(
            "POST",
            &format!("/api/roles/{}/permissions", guest.id),
            Some(json!({"permissions": [view, 9999]})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let guest = app.store.find_role_by_id(guest.id).await.unwrap().unwrap();
    assert!(guest.permissions.is_empty());
}

#[tokio::test]
async fn test_customer_cannot_change_role_graph() {
    let app = TestApp::new();
    app.create_user("carol", names::ROLE_CUSTOMER).await;
    let (access, _) = app.tokens("carol", "phone").await;
    let customer = app
        .store
        .find_role_by_name(names::ROLE_CUSTOMER)
        .await
        .unwrap()
        .unwrap();
    let system = permission_id(&app, names::SYSTEM_ADMIN).await;

    let create = app
        .request("POST", "/api/roles", Some(json!({"name": "Mine"})), Some(&access))
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);

    let grant = app
        .request(
            "POST",
            &format!("/api/roles/{}/permissions", customer.id),
            Some(json!({"permissions": [system]})),
            Some(&access),
        )
        .await;
    assert_eq!(grant.status, StatusCode::FORBIDDEN);

    let delete = app
        .request(
            "DELETE",
            &format!("/api/permissions/{system}"),
            None,
            Some(&access),
        )
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
    assert!(
        app.store
            .find_role_by_id(customer.id)
            .await
            .unwrap()
            .unwrap()
            .permissions
            .is_empty()
    );
}

#[tokio::test]
async fn test_remove_user_from_role() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let bob = app.create_user("bob", names::ROLE_ADMIN).await;
    let (admin, _) = app.tokens("ada", "laptop").await;
    let (access, _) = app.tokens("bob", "phone").await;
    let role = app
        .store
        .find_role_by_name(names::ROLE_ADMIN)
        .await
        .unwrap()
        .unwrap();

    let path = format!("/api/roles/{}/users/{}", role.id, bob.id);
    let removed = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let again = app.request("DELETE", &path, None, Some(&admin)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let list = app.request("GET", "/api/users", None, Some(&access)).await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deleted_role_stops_authorizing_holders() {
    let app = TestApp::new();
    app.create_user("root", names::ROLE_SYSTEM_ADMIN).await;
    app.create_user("ada", names::ROLE_ADMIN).await;
    let (root, _) = app.tokens("root", "console").await;
    let (ada, _) = app.tokens("ada", "laptop").await;
    let role = app
        .store
        .find_role_by_name(names::ROLE_ADMIN)
        .await
        .unwrap()
        .unwrap();

    let deleted = app
        .request("DELETE", &format!("/api/roles/{}", role.id), None, Some(&root))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let fetched = app
        .request("GET", &format!("/api/roles/{}", role.id), None, Some(&root))
        .await;
    assert_eq!(fetched.status, StatusCode::NOT_FOUND);

    let list = app.request("GET", "/api/users", None, Some(&ada)).await;
    assert_eq!(list.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_permission_lifecycle() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let (admin, _) = app.tokens("ada", "laptop").await;

    let created = app
        .request(
            "POST",
            "/api/permissions",
            Some(json!({"name": "REPORTS_VIEW", "description": "View reports"})),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();

    let duplicate = app
        .request(
            "POST",
            "/api/permissions",
            Some(json!({"name": "REPORTS_VIEW"})),
            Some(&admin),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let renamed = app
        .request(
            "PUT",
            &format!("/api/permissions/{id}"),
            Some(json!({"name": "REPORTS_READ", "description": "Read reports"})),
            Some(&admin),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.str("name"), "REPORTS_READ");

    let fetched = app
        .request("GET", &format!("/api/permissions/{id}"), None, Some(&admin))
        .await;
    assert_eq!(fetched.str("description"), "Read reports");

    let deleted = app
        .request("DELETE", &format!("/api/permissions/{id}"), None, Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app
        .request("GET", &format!("/api/permissions/{id}"), None, Some(&admin))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_role_name_rejected() {
    let app = TestApp::new();
    app.create_user("ada", names::ROLE_ADMIN).await;
    let (admin, _) = app.tokens("ada", "laptop").await;

    let response = app
        .request("POST", "/api/roles", Some(json!({"name": ""})), Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}
