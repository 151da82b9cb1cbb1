//! Role handlers: role CRUD, permission grants and role holders.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;
use validator::Validate;

use identity_entity::permission::names;
use identity_entity::role::RoleFields;

use crate::dto::request::{GrantPermissionsRequest, NamedEntryRequest};
use crate::dto::response::RoleResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RoleResponse>>, ApiError> {
    state
        .auth
        .authorize(auth.user_id(), &[names::ROLES_VIEW])
        .await?;

    let roles = state.roles.list_roles().await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

/// GET /api/roles/{id}
pub async fn get_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<RoleResponse>, ApiError> {
    state
        .auth
        .authorize(auth.user_id(), &[names::ROLES_VIEW])
        .await?;

    let role = state.roles.get_role(id).await?;
    Ok(Json(role.into()))
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NamedEntryRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), ApiError> {
    req.validate()?;
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::MANAGE_ROLES])
        .await?;

    let role = state
        .roles
        .create_role(
            actor.id,
            RoleFields {
                name: req.name,
                description: req.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(role.into())))
}

/// PUT /api/roles/{id}
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(req): Json<NamedEntryRequest>,
) -> Result<Json<RoleResponse>, ApiError> {
    req.validate()?;
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::MANAGE_ROLES])
        .await?;

    let role = state
        .roles
        .update_role(
            actor.id,
            id,
            RoleFields {
                name: req.name,
                description: req.description,
            },
        )
        .await?;
    Ok(Json(role.into()))
}

/// DELETE /api/roles/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::MANAGE_ROLES])
        .await?;

    state.roles.delete_role(actor.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/roles/{id}/permissions
pub async fn grant_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(req): Json<GrantPermissionsRequest>,
) -> Result<Json<RoleResponse>, ApiError> {
    req.validate()?;
    let actor = state
        .auth
        .authorize(
            auth.user_id(),
            &[names::MANAGE_PERMISSION, names::PERMISSION_ASSIGN_TO_ROLE],
        )
        .await?;

    let role = state
        .roles
        .grant_permissions(actor.id, id, &req.permissions)
        .await?;
    Ok(Json(role.into()))
}

/// DELETE /api/roles/{id}/permissions/{permission_id}
pub async fn withdraw_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, permission_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    let actor = state
        .auth
        .authorize(
            auth.user_id(),
            &[names::MANAGE_PERMISSION, names::PERMISSION_ASSIGN_TO_ROLE],
        )
        .await?;

    state
        .roles
        .withdraw_permission(actor.id, id, permission_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/roles/{id}/users/{user_id}
pub async fn remove_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, user_id)): Path<(i32, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::USERS_ASSIGN_TO_ROLE])
        .await?;

    state.accounts.remove_role(actor.id, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
