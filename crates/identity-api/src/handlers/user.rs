//! User handlers: self profile, administration, passwords, role assignment.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use identity_auth::Signup;
use identity_entity::permission::names;
use identity_entity::user::UpdatePrincipal;

use crate::dto::request::{
    AssignRoleRequest, CreateUserRequest, SetEnabledRequest, SetPasswordRequest,
    UpdateUserRequest,
};
use crate::dto::response::UserResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let principal = state.auth.authorize(auth.user_id(), &[]).await?;
    Ok(Json(principal.into()))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    state
        .auth
        .authorize(auth.user_id(), &[names::USERS_VIEW])
        .await?;

    let users = state.accounts.list_principals().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    state
        .auth
        .authorize(auth.user_id(), &[names::USERS_VIEW])
        .await?;

    let user = state.accounts.get_principal(id).await?;
    Ok(Json(user.into()))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    req.validate()?;
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::USERS_CREATE])
        .await?;

    let user = state
        .accounts
        .create_principal(
            actor.id,
            Signup {
                username: req.username,
                first_name: req.firstname,
                last_name: req.lastname,
                email: req.email,
                password: req.password,
            },
            req.roles,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    req.validate()?;
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::USERS_CREATE])
        .await?;

    let user = state
        .accounts
        .update_principal(
            actor.id,
            id,
            UpdatePrincipal {
                username: req.username,
                first_name: req.firstname,
                last_name: req.lastname,
                email: req.email,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::USERS_CREATE])
        .await?;

    state.accounts.delete_principal(actor.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/users/{id}/password
///
/// A principal may always change its own password; changing another's
/// requires `USERS_CHANGE_PWD`.
pub async fn set_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    req.validate()?;
    let required: &[&str] = if auth.user_id() == id {
        &[]
    } else {
        &[names::USERS_CHANGE_PWD]
    };
    let actor = state.auth.authorize(auth.user_id(), required).await?;

    state
        .accounts
        .set_password(actor.id, id, &req.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/users/{id}/enabled
///
/// Re-enabling a locked account also requires `USERS_UNLOCK`.
pub async fn set_enabled(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetEnabledRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let required: &[&str] = if req.enabled {
        &[names::USERS_ACTIVATE, names::USERS_UNLOCK]
    } else {
        &[names::USERS_ACTIVATE]
    };
    let actor = state.auth.authorize(auth.user_id(), required).await?;

    let user = state.accounts.set_enabled(actor.id, id, req.enabled).await?;
    Ok(Json(user.into()))
}

/// POST /api/users/{id}/roles
pub async fn assign_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::USERS_ASSIGN_TO_ROLE])
        .await?;

    let user = state.accounts.assign_role(actor.id, id, req.role_id).await?;
    Ok(Json(user.into()))
}
