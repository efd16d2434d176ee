//! Signing/verification port and its JWT implementation.
//!
//! The codec is the only place signing keys live, so the algorithm is
//! swappable and tests can run with deterministic keys.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{AccessClaims, RefreshClaims, JWT_AUDIENCE, JWT_ISSUER};
use crate::errors::TokenError;

/// Capability interface for token signing and verification
pub trait TokenCodec: Send + Sync {
    /// Sign access claims into a token string
    fn sign_access(&self, claims: &AccessClaims) -> Result<String, TokenError>;

    /// Sign refresh claims into a token string
    fn sign_refresh(&self, claims: &RefreshClaims) -> Result<String, TokenError>;

    /// Verify an access token's signature, expiry, issuer, and audience.
    ///
    /// Every failure mode collapses to `InvalidToken`.
    fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError>;

    /// Verify a refresh token's signature, expiry, issuer, and audience
    fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError>;

    /// Decode refresh claims without verifying signature or expiry.
    ///
    /// Used on logout, where a near-expiry token must still identify the
    /// record to revoke.
    fn decode_refresh_unverified(&self, token: &str) -> Result<RefreshClaims, TokenError>;
}

/// HS256 JWT codec with independent access and refresh secrets
pub struct JwtCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl JwtCodec {
    /// Creates a codec from the two signing secrets
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.validate_exp = true;

        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            validation,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn sign_access(&self, claims: &AccessClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.access_encoding)
            .map_err(|_| TokenError::GenerationFailed)
    }

    fn sign_refresh(&self, claims: &RefreshClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.refresh_encoding)
            .map_err(|_| TokenError::GenerationFailed)
    }

    fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        decode::<AccessClaims>(token, &self.access_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::InvalidToken)
    }

    fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::InvalidToken)
    }

    fn decode_refresh_unverified(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<RefreshClaims>(token, &self.refresh_decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::InvalidToken)
    }
}
