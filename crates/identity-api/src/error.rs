//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use identity_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// An `AppError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self(AppError::validation(errors.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;

        // Token failures all look alike to the client.
        let (status, code, message) = match err.kind {
            kind if kind.is_unauthenticated() => {
                warn!(kind = %kind, reason = %err.message, "Request not authenticated");
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized".to_string())
            }
            ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "Forbidden".to_string()),
            ErrorKind::InvalidCredential => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIAL",
                "Invalid email or password".to_string(),
            ),
            ErrorKind::AccountLocked => {
                (StatusCode::UNPROCESSABLE_ENTITY, "ACCOUNT_LOCKED", err.message)
            }
            ErrorKind::RefreshTokenInvalid => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "REFRESH_TOKEN_INVALID",
                err.message,
            ),
            ErrorKind::Validation => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", err.message)
            }
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.message),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT", err.message),
            ErrorKind::StoreUnavailable => {
                error!(error = %err, source = ?err.source, "Store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            _ => {
                error!(error = %err, source = ?err.source, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ApiErrorResponse {
            error: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
