//! Login, refresh, logout and authorization flows.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use identity_core::error::AppError;
use identity_core::result::AppResult;
use identity_database::traits::CredentialStore;
use identity_entity::user::{AuthProvider, Principal};

use crate::jwt::{AccessTokenClaims, IssuedToken, TokenCodec};
use crate::password::PasswordHasher;
use crate::rbac::PermissionResolver;
use crate::revocation::RevocationCache;
use crate::session::{OpenedSession, SessionStore};

/// Token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh secret bound to the device session.
    pub refresh_token: String,
    /// Access token expiry (seconds since epoch).
    pub expiry_date: i64,
    /// Device the session is bound to.
    pub device_id: String,
}

impl LoginResponse {
    fn new(issued: IssuedToken, opened: OpenedSession) -> Self {
        Self {
            access_token: issued.token,
            refresh_token: opened.refresh_secret,
            expiry_date: issued.claims.exp,
            device_id: opened.session.device_id,
        }
    }
}

/// The single entry point for authentication and authorization.
///
/// Store reads happen first; token issuing follows, and session and
/// revocation writes come last, so a failed lookup never leaves a partial
/// session or a stray revocation behind.
#[derive(Clone)]
pub struct AuthService {
    codec: Arc<TokenCodec>,
    revocations: Arc<RevocationCache>,
    sessions: Arc<SessionStore>,
    resolver: Arc<PermissionResolver>,
    credentials: Arc<dyn CredentialStore>,
    hasher: Arc<PasswordHasher>,
    access_ttl: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl AuthService {
    /// Creates the service from its collaborators.
    pub fn new(
        codec: Arc<TokenCodec>,
        revocations: Arc<RevocationCache>,
        sessions: Arc<SessionStore>,
        resolver: Arc<PermissionResolver>,
        credentials: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        access_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            revocations,
            sessions,
            resolver,
            credentials,
            hasher,
            access_ttl,
        }
    }

    /// Logs a principal in on a device.
    ///
    /// With [`AuthProvider::Local`] the password is verified. An external
    /// provider skips the password check, but only for principals that were
    /// registered through that same provider.
    pub async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
        device_id: &str,
        provider: &AuthProvider,
    ) -> AppResult<LoginResponse> {
        let principal = match self.credentials.find_by_email(identifier).await? {
            Some(p) => p,
            None => {
                warn!("Login failed: unknown identifier");
                return Err(AppError::invalid_credential("Invalid email or password"));
            }
        };

        if principal.is_locked() {
            warn!(user_id = %principal.id, "Login refused: account is locked");
            return Err(AppError::account_locked("Account is locked"));
        }

        if provider.is_local() {
            if !self.hasher.verify_password(secret, &principal.password_hash)? {
                warn!(user_id = %principal.id, "Login failed: wrong password");
                return Err(AppError::invalid_credential("Invalid email or password"));
            }
        } else if provider.as_str() != principal.provider {
            warn!(
                user_id = %principal.id,
                provider = provider.as_str(),
                "Login failed: provider mismatch"
            );
            return Err(AppError::invalid_credential("Invalid email or password"));
        }

        let issued = self.issue_for(&principal)?;
        let opened = self.sessions.open(principal.id, device_id).await?;

        info!(
            user_id = %principal.id,
            device_id = %device_id,
            provider = provider.as_str(),
            "Login succeeded"
        );
        Ok(LoginResponse::new(issued, opened))
    }

    /// Exchanges a refresh secret and the current access token for a new pair.
    ///
    /// The presented access token is revoked for the rest of its lifetime.
    pub async fn refresh(
        &self,
        principal_id: Uuid,
        access_token: &str,
        refresh_secret: &str,
    ) -> AppResult<LoginResponse> {
        if self.revocations.is_revoked(principal_id, access_token).await? {
            return Err(AppError::unauthorized("Token has been revoked"));
        }

        let claims = self.codec.verify(access_token)?;
        if claims.user_id != principal_id {
            return Err(AppError::unauthorized("Token does not belong to principal"));
        }

        let principal = self
            .credentials
            .find_by_id(principal_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Principal no longer exists"))?;
        if principal.is_locked() {
            return Err(AppError::account_locked("Account is locked"));
        }

        let issued = self.issue_for(&principal)?;
        let opened = self.sessions.rotate(principal_id, refresh_secret).await?;
        self.revocations
            .invalidate_until(principal_id, access_token, claims.expires_at())
            .await?;

        info!(
            user_id = %principal_id,
            device_id = %opened.session.device_id,
            "Token refreshed"
        );
        Ok(LoginResponse::new(issued, opened))
    }

    /// Logs a principal out of a device and revokes the presented token.
    ///
    /// The caller must already have verified `access_token`; `token_expiry`
    /// is its expiry instant. Logging out of a device without a session still
    /// revokes the token.
    pub async fn revoke(
        &self,
        principal_id: Uuid,
        device_id: &str,
        access_token: &str,
        token_expiry: DateTime<Utc>,
    ) -> AppResult<()> {
        if self.revocations.is_revoked(principal_id, access_token).await? {
            return Err(AppError::unauthorized("Token has been revoked"));
        }

        let principal = self
            .credentials
            .find_by_id(principal_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Principal no longer exists"))?;
        if principal.is_locked() {
            return Err(AppError::account_locked("Account is locked"));
        }

        let closed = self.sessions.close(principal_id, device_id).await?;
        if closed == 0 {
            warn!(
                user_id = %principal_id,
                device_id = %device_id,
                "Logout for device without a session"
            );
        }
        self.revocations
            .invalidate_until(principal_id, access_token, token_expiry)
            .await?;

        info!(user_id = %principal_id, device_id = %device_id, "Logged out");
        Ok(())
    }

    /// Verifies an access token and rejects it if revoked.
    pub async fn verify_access(&self, token: &str) -> AppResult<AccessTokenClaims> {
        let claims = self.codec.verify(token)?;
        if self.revocations.is_revoked(claims.user_id, token).await? {
            return Err(AppError::unauthorized("Token has been revoked"));
        }
        Ok(claims)
    }

    /// Loads the principal fresh from the store and checks that it holds
    /// every permission in `required`.
    ///
    /// The role embedded in the token is never consulted.
    pub async fn authorize(&self, principal_id: Uuid, required: &[&str]) -> AppResult<Principal> {
        let principal = self
            .credentials
            .find_by_id(principal_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Principal no longer exists"))?;
        if principal.is_locked() {
            return Err(AppError::forbidden("Forbidden"));
        }

        self.resolver.require(&principal, required)?;
        Ok(principal)
    }

    fn issue_for(&self, principal: &Principal) -> AppResult<IssuedToken> {
        self.codec
            .issue(AccessTokenClaims::for_principal(principal), self.access_ttl)
    }
}
