//! Route definitions for the identity HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with every route, threading `AppState` through.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(role_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Login, refresh, logout and signup
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/signup", post(handlers::auth::signup))
}

/// Self profile and user administration
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::me))
        .route(
            "/users",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::user::get_user)
                .put(handlers::user::update_user)
                .delete(handlers::user::delete_user),
        )
        .route("/users/{id}/password", put(handlers::user::set_password))
        .route("/users/{id}/enabled", put(handlers::user::set_enabled))
        .route("/users/{id}/roles", post(handlers::user::assign_role))
}

/// Roles, permissions and the grants between them
fn role_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/roles",
            get(handlers::role::list_roles).post(handlers::role::create_role),
        )
        .route(
            "/roles/{id}",
            get(handlers::role::get_role)
                .put(handlers::role::update_role)
                .delete(handlers::role::delete_role),
        )
        .route(
            "/roles/{id}/permissions",
            post(handlers::role::grant_permissions),
        )
        .route(
            "/roles/{id}/permissions/{permission_id}",
            delete(handlers::role::withdraw_permission),
        )
        .route(
            "/roles/{id}/users/{user_id}",
            delete(handlers::role::remove_user),
        )
        .route(
            "/permissions",
            get(handlers::permission::list_permissions)
                .post(handlers::permission::create_permission),
        )
        .route(
            "/permissions/{id}",
            get(handlers::permission::get_permission)
                .put(handlers::permission::update_permission)
                .delete(handlers::permission::delete_permission),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
