//! `AuthUser` extractor: a verified, unrevoked access token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use identity_auth::AccessTokenClaims;

use crate::error::ApiError;
use crate::extractors::BearerToken;
use crate::state::AppState;

/// Authenticated caller. Holds the verified claims and the raw token, which
/// refresh and logout need to revoke it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Verified claims.
    pub claims: AccessTokenClaims,
    /// The token as presented.
    pub token: String,
}

impl AuthUser {
    /// The caller's principal id.
    pub fn user_id(&self) -> Uuid {
        self.claims.user_id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let claims = state.auth.verify_access(&token).await?;

        Ok(Self { claims, token })
    }
}
