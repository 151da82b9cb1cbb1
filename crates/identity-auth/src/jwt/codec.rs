//! HS512 access token issuing and verification.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use identity_core::config::AuthConfig;
use identity_core::error::{AppError, ErrorKind};
use identity_core::result::AppResult;

use super::claims::AccessTokenClaims;

/// An encoded access token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The compact JWS string.
    pub token: String,
    /// Claims as signed, with `exp` filled in.
    pub claims: AccessTokenClaims,
    /// Expiry instant, second precision.
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access tokens with a process-wide HMAC-SHA-512 secret.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS512)
            .finish()
    }
}

impl TokenCodec {
    /// Creates a codec from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::from_secret(config.jwt_secret.as_bytes())
    }

    /// Creates a codec from a raw signing secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Signs `claims` with an expiry of now plus `ttl`.
    pub fn issue(&self, claims: AccessTokenClaims, ttl: Duration) -> AppResult<IssuedToken> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal(format!("Token lifetime out of range: {e}")))?;
        self.issue_until(claims, Utc::now() + ttl)
    }

    /// Signs `claims` with an explicit expiry instant.
    ///
    /// Identical claims and expiry always produce the same token.
    pub fn issue_until(
        &self,
        mut claims: AccessTokenClaims,
        expires_at: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        claims.exp = expires_at.timestamp();

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(IssuedToken {
            expires_at: claims.expires_at(),
            token,
            claims,
        })
    }

    /// Parses and validates a token.
    ///
    /// Structure problems are `Malformed`. Once the header parses, any
    /// algorithm, signature or payload problem is `InvalidSignature`, and a
    /// verified token past its expiry is `Expired`.
    pub fn verify(&self, token: &str) -> AppResult<AccessTokenClaims> {
        self.verify_at(token, Utc::now())
    }

    /// Like [`verify`](Self::verify), judging expiry at `now`.
    ///
    /// `jsonwebtoken` only compares whole seconds, so the sub-second check
    /// against `now` happens here after the signature is verified.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<AccessTokenClaims> {
        if token.split('.').count() != 3 {
            return Err(AppError::malformed("Token must have three segments"));
        }
        jsonwebtoken::decode_header(token).map_err(|e| {
            AppError::with_source(ErrorKind::Malformed, "Unreadable token header", e)
        })?;

        let claims =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
                .map(|data| data.claims)
                .map_err(|e| {
                    let kind = match e.kind() {
                        JwtErrorKind::ExpiredSignature => ErrorKind::Expired,
                        JwtErrorKind::InvalidToken => ErrorKind::Malformed,
                        _ => ErrorKind::InvalidSignature,
                    };
                    AppError::with_source(kind, "Access token rejected", e)
                })?;

        if claims.is_expired_at(now) {
            return Err(AppError::expired("Access token expired"));
        }
        Ok(claims)
    }
}
