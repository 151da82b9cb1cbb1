//! `BearerToken` extractor: the raw access token of a request.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use serde::Deserialize;

use identity_core::error::AppError;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// The unverified access token presented by the client.
///
/// Looked up in the `token` query parameter first, then in the
/// `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl BearerToken {
    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Ok(Query(TokenQuery { token: Some(token) })) =
            Query::<TokenQuery>::try_from_uri(&parts.uri)
        {
            if !token.is_empty() {
                return Ok(Self(token));
            }
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::unauthorized("Missing bearer token"))?;

        Ok(Self(bearer.token().to_string()))
    }
}
