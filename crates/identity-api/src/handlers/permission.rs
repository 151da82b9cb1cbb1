//! Permission handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use validator::Validate;

use identity_entity::permission::{PermissionFields, names};

use crate::dto::request::NamedEntryRequest;
use crate::dto::response::PermissionResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PermissionResponse>>, ApiError> {
    state
        .auth
        .authorize(auth.user_id(), &[names::VIEW_PERMISSION])
        .await?;

    let permissions = state.roles.list_permissions().await?;
    Ok(Json(
        permissions
            .into_iter()
            .map(PermissionResponse::from)
            .collect(),
    ))
}

/// GET /api/permissions/{id}
pub async fn get_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<PermissionResponse>, ApiError> {
    state
        .auth
        .authorize(auth.user_id(), &[names::VIEW_PERMISSION])
        .await?;

    let permission = state.roles.get_permission(id).await?;
    Ok(Json(permission.into()))
}

/// POST /api/permissions
pub async fn create_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<NamedEntryRequest>,
) -> Result<(StatusCode, Json<PermissionResponse>), ApiError> {
    req.validate()?;
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::MANAGE_PERMISSION])
        .await?;

    let permission = state
        .roles
        .create_permission(
            actor.id,
            PermissionFields {
                name: req.name,
                description: req.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(permission.into())))
}

/// PUT /api/permissions/{id}
pub async fn update_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(req): Json<NamedEntryRequest>,
) -> Result<Json<PermissionResponse>, ApiError> {
    req.validate()?;
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::MANAGE_PERMISSION])
        .await?;

    let permission = state
        .roles
        .update_permission(
            actor.id,
            id,
            PermissionFields {
                name: req.name,
                description: req.description,
            },
        )
        .await?;
    Ok(Json(permission.into()))
}

/// DELETE /api/permissions/{id}
pub async fn delete_permission(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let actor = state
        .auth
        .authorize(auth.user_id(), &[names::MANAGE_PERMISSION])
        .await?;

    state.roles.delete_permission(actor.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
