//! Auth handlers: login, refresh, logout, signup.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use identity_auth::{LoginResponse, Signup};
use identity_entity::user::AuthProvider;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest, SignupRequest};
use crate::dto::response::{MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    req.validate()?;

    let response = state
        .auth
        .authenticate(&req.email, &req.password, &req.device_id, &AuthProvider::Local)
        .await?;

    Ok(Json(response))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    req.validate()?;

    let response = state
        .auth
        .refresh(auth.user_id(), &auth.token, &req.refresh_token)
        .await?;

    Ok(Json(response))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogoutRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate()?;

    state
        .auth
        .revoke(
            auth.user_id(),
            &req.device_id,
            &auth.token,
            auth.claims.expires_at(),
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Successfully logged out".to_string(),
    }))
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    req.validate()?;

    let principal = state
        .accounts
        .signup(Signup {
            username: req.username,
            first_name: req.firstname,
            last_name: req.lastname,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(principal.into())))
}
