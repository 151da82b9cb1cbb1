//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use identity_api::{AppState, build_app};
use identity_auth::{
    AccountService, AuthService, PasswordHasher, PasswordValidator, PermissionResolver,
    RevocationCache, RoleService, SessionStore, TokenCodec,
};
use identity_cache::CacheManager;
use identity_core::config::{AuthConfig, CacheConfig, CorsConfig};
use identity_database::CredentialStore;
use identity_database::memory::{MemoryCredentialStore, MemorySessionRepository};
use identity_entity::user::{AuthProvider, CreatePrincipal, Principal};

pub const SECRET: &[u8] = b"integration-test-signing-secret";
pub const PASSWORD: &str = "Velvet-harbor-73-kite";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Credential store behind the router
    pub store: Arc<MemoryCredentialStore>,
    /// Codec sharing the router's signing secret
    pub codec: TokenCodec,
    hasher: Arc<PasswordHasher>,
}

/// Status and parsed JSON body of a response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// A string field of the body.
    pub fn str(&self, field: &str) -> String {
        self.body[field].as_str().unwrap_or_default().to_string()
    }
}

impl TestApp {
    /// Create a new test application with default roles seeded
    pub fn new() -> Self {
        let store = Arc::new(MemoryCredentialStore::with_default_roles());
        let cache = Arc::new(CacheManager::new(&CacheConfig::default()));
        let hasher = Arc::new(PasswordHasher::new());

        let auth = Arc::new(AuthService::new(
            Arc::new(TokenCodec::from_secret(SECRET)),
            Arc::new(RevocationCache::new(Arc::clone(&cache))),
            Arc::new(SessionStore::new(
                Arc::new(MemorySessionRepository::new()),
                Duration::from_secs(3600),
            )),
            Arc::new(PermissionResolver::new()),
            store.clone(),
            Arc::clone(&hasher),
            Duration::from_secs(900),
        ));
        let accounts = Arc::new(AccountService::new(
            store.clone(),
            Arc::clone(&hasher),
            Arc::new(PasswordValidator::new(&AuthConfig::default())),
        ));

        let roles = Arc::new(RoleService::new(store.clone()));

        let router = build_app(
            AppState::new(auth, accounts, roles, cache),
            &CorsConfig::default(),
        );

        Self {
            router,
            store,
            codec: TokenCodec::from_secret(SECRET),
            hasher,
        }
    }

    /// Insert a local user with [`PASSWORD`] and the given role.
    pub async fn create_user(&self, username: &str, role: &str) -> Principal {
        let role = self.store.find_role_by_name(role).await.unwrap().unwrap();
        self.store
            .create_principal(CreatePrincipal {
                username: username.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email(username),
                password_hash: self.hasher.hash_password(PASSWORD).unwrap(),
                provider: AuthProvider::Local.as_str().to_string(),
                created_by: None,
                role_ids: vec![role.id],
            })
            .await
            .unwrap()
    }

    /// Log in as `username` on `device`.
    pub async fn login(&self, username: &str, device: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "email": email(username),
                "password": PASSWORD,
                "device_id": device,
            })),
            None,
        )
        .await
    }

    /// Log in and return the access and refresh tokens.
    pub async fn tokens(&self, username: &str, device: &str) -> (String, String) {
        let response = self.login(username, device).await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        (response.str("access_token"), response.str("refresh_token"))
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).unwrap())
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let response = self
            .router
            .clone()
            .oneshot(req.body(Body::from(body_str)).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Email address used for a test username.
pub fn email(username: &str) -> String {
    format!("{username}@example.com")
}
