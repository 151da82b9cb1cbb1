//! Self-registration and health.

use axum::http::StatusCode;
use serde_json::json;

use identity_entity::permission::names;

use crate::helpers::{PASSWORD, TestApp};

fn signup_body(username: &str, email: &str, password: &str) -> serde_json::Value {
    json!({
        "username": username,
        "firstname": "Dana",
        "lastname": "Scully",
        "email": email,
        "password": password,
    })
}

#[tokio::test]
async fn test_signup_grants_customer_role() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(signup_body("dana", "dana@example.com", PASSWORD)),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.str("username"), "dana");
    assert_eq!(response.body["roles"], json!([names::ROLE_CUSTOMER]));
    assert!(response.body.get("password_hash").is_none());

    let login = app.login("dana", "laptop").await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_signup_rejects_taken_email() {
    let app = TestApp::new();
    app.create_user("dana", names::ROLE_CUSTOMER).await;

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(signup_body("dana2", "DANA@example.com", PASSWORD)),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_rejects_weak_password() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(signup_body("dana", "dana@example.com", "password")),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.str("error"), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(signup_body("dana", "not-an-email", PASSWORD)),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_reports_ok() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.str("status"), "ok");
    assert_eq!(response.str("cache"), "connected");
}
