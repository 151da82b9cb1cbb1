//! Unified application error types for the identity service.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The boundary layer translates the
//! [`ErrorKind`] into a transport-level response.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The token structure could not be parsed.
    Malformed,
    /// The token signature or declared algorithm did not verify.
    InvalidSignature,
    /// The token is past its expiry instant.
    Expired,
    /// The token was revoked, or the caller could not be identified.
    Unauthorized,
    /// The principal is valid but lacks a required permission.
    Forbidden,
    /// The principal is disabled.
    AccountLocked,
    /// The presented password did not match.
    InvalidCredential,
    /// The refresh secret is unknown, superseded, or expired.
    RefreshTokenInvalid,
    /// A backing store call failed or timed out.
    StoreUnavailable,
    /// The requested resource was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate entry).
    Conflict,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind belongs to the token/caller identification family.
    ///
    /// These are reported to clients with one generic message so a caller
    /// cannot tell a tampered token from an expired or revoked one.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::Malformed | Self::InvalidSignature | Self::Expired | Self::Unauthorized
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "MALFORMED"),
            Self::InvalidSignature => write!(f, "INVALID_SIGNATURE"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::AccountLocked => write!(f, "ACCOUNT_LOCKED"),
            Self::InvalidCredential => write!(f, "INVALID_CREDENTIAL"),
            Self::RefreshTokenInvalid => write!(f, "REFRESH_TOKEN_INVALID"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error.
///
/// Carries a kind for the boundary layer, a message for logs, and an
/// optional underlying cause.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a malformed-token error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, message)
    }

    /// Create an invalid-signature error.
    pub fn invalid_signature(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSignature, message)
    }

    /// Create an expired-token error.
    pub fn expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Expired, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create an account-locked error.
    pub fn account_locked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountLocked, message)
    }

    /// Create an invalid-credential error.
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCredential, message)
    }

    /// Create a refresh-token-invalid error.
    pub fn refresh_token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RefreshTokenInvalid, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
