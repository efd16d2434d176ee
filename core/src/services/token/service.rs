//! Main token service implementation

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::{
    AccessClaims, RefreshClaims, RefreshTokenRecord, TokenPair, REFRESH_SECRET_BYTES,
};
use crate::domain::entities::user::UserRole;
use crate::domain::value_objects::ClientMetadata;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// Verified access-token identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedAccess {
    /// Subject user ID
    pub user_id: Uuid,

    /// Role embedded at issuance
    pub role: UserRole,
}

/// Service for minting, verifying, rotating, and revoking token pairs
pub struct TokenService<R, U, C>
where
    R: TokenRepository,
    U: UserRepository,
    C: TokenCodec,
{
    tokens: Arc<R>,
    users: Arc<U>,
    codec: C,
    config: TokenServiceConfig,
}

impl<R, U, C> TokenService<R, U, C>
where
    R: TokenRepository,
    U: UserRepository,
    C: TokenCodec,
{
    /// Creates a new token service
    pub fn new(tokens: Arc<R>, users: Arc<U>, codec: C, config: TokenServiceConfig) -> Self {
        Self {
            tokens,
            users,
            codec,
            config,
        }
    }

    /// Issue a token pair for a user.
    ///
    /// Signs a short-lived access token embedding `{subject, role}` and a
    /// long-lived refresh token embedding a fresh random secret. The record
    /// persisted alongside stores only the salted hash of that secret, with
    /// its expiry copied from the refresh token's own claim.
    pub async fn issue(
        &self,
        user_id: Uuid,
        role: UserRole,
        metadata: &ClientMetadata,
    ) -> DomainResult<TokenPair> {
        let access_claims = AccessClaims::new(user_id, role, self.config.access_ttl_minutes);
        let access_token = self.codec.sign_access(&access_claims)?;

        let secret = generate_refresh_secret();
        let refresh_claims =
            RefreshClaims::new(user_id, secret.clone(), self.config.refresh_ttl_days);
        let refresh_token = self.codec.sign_refresh(&refresh_claims)?;

        let expires_at = refresh_claims
            .expires_at()
            .ok_or(TokenError::GenerationFailed)?;

        let record = RefreshTokenRecord::new(
            user_id,
            self.hash_secret(&secret),
            metadata.user_agent_hash(),
            metadata.ip_hash(),
            expires_at,
        );
        self.tokens
            .create(record)
            .await
            .map_err(|_| DomainError::Token(TokenError::GenerationFailed))?;

        tracing::info!(
            user_id = %user_id,
            role = role.as_str(),
            event = "token_pair_issued",
            "Issued new token pair"
        );

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_ttl_seconds(),
        ))
    }

    /// Verify an access token and return its identity.
    ///
    /// A pure signature/expiry check, performed on every request; it never
    /// touches persistent storage. Every failure is `InvalidToken`.
    pub fn verify_access(&self, token: &str) -> DomainResult<VerifiedAccess> {
        let claims = self.codec.verify_access(token)?;
        let user_id = claims.user_id().map_err(|_| TokenError::InvalidToken)?;

        Ok(VerifiedAccess {
            user_id,
            role: claims.role,
        })
    }

    /// Exchange a refresh token for a fresh pair, revoking the old token.
    ///
    /// Whether the token is forged, expired, revoked, unknown, or lost a
    /// concurrent rotation race, the caller sees the same `InvalidToken`.
    /// The repository's atomic revoke guarantees at most one rotation
    /// succeeds per refresh-token generation.
    ///
    /// Not retryable: a failure after the revoke has landed would mint a
    /// second pair, so callers must send the user back to a fresh login
    /// instead of retrying.
    pub async fn rotate(
        &self,
        refresh_token: &str,
        metadata: &ClientMetadata,
    ) -> DomainResult<TokenPair> {
        let claims = self.codec.verify_refresh(refresh_token)?;
        let token_hash = self.hash_secret(&claims.secret);

        let record = self
            .tokens
            .find_active_by_hash(&token_hash)
            .await?
            .ok_or(TokenError::InvalidToken)?;

        if record.is_expired() {
            return Err(TokenError::InvalidToken.into());
        }

        // Exactly one concurrent rotation observes this transition
        if !self.tokens.revoke_by_hash(&token_hash).await? {
            tracing::warn!(
                user_id = %record.user_id,
                event = "refresh_rotation_race_lost",
                "Refresh token was revoked concurrently"
            );
            return Err(TokenError::InvalidToken.into());
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(TokenError::InvalidToken)?;

        tracing::info!(
            user_id = %record.user_id,
            event = "refresh_token_rotated",
            "Rotated refresh token"
        );

        self.issue(record.user_id, user.role, metadata).await
    }

    /// Revoke every outstanding refresh token for a user. Idempotent.
    pub async fn revoke_all(&self, user_id: Uuid) -> DomainResult<usize> {
        let revoked = self.tokens.revoke_all_for_user(user_id).await?;
        tracing::info!(
            user_id = %user_id,
            revoked,
            event = "tokens_revoked_for_user",
            "Revoked all refresh tokens for user"
        );
        Ok(revoked)
    }

    /// Revoke the record behind a refresh token, for normal logout.
    ///
    /// Decodes without full verification so a near-expiry token can still be
    /// revoked; silently no-ops when nothing matches.
    pub async fn revoke_by_token(&self, refresh_token: &str) -> DomainResult<()> {
        let claims = match self.codec.decode_refresh_unverified(refresh_token) {
            Ok(claims) => claims,
            Err(_) => return Ok(()),
        };

        let token_hash = self.hash_secret(&claims.secret);
        let _ = self.tokens.revoke_by_hash(&token_hash).await?;
        Ok(())
    }

    /// Salted hash of a raw refresh secret.
    ///
    /// The secret is the thing hashed, never the signed envelope.
    pub(crate) fn hash_secret(&self, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.update(self.config.refresh_token_salt.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Cryptographically random refresh secret, hex-encoded
fn generate_refresh_secret() -> String {
    let mut bytes = [0u8; REFRESH_SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
