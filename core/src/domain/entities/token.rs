//! Token entities for JWT-based sessions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::UserRole;

/// JWT issuer
pub const JWT_ISSUER: &str = "savora";

/// JWT audience
pub const JWT_AUDIENCE: &str = "savora-api";

/// Size of the raw refresh secret in bytes (hex-encoded into the claim)
pub const REFRESH_SECRET_BYTES: usize = 32;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Role of the subject
    pub role: UserRole,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID
    pub jti: String,
}

impl AccessClaims {
    /// Creates claims for a new access token
    pub fn new(user_id: Uuid, role: UserRole, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::minutes(ttl_minutes);

        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Parses the subject back into a user ID
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Claims carried by a refresh token.
///
/// `secret` is the raw revocable secret; the persisted record stores only its
/// salted hash, so this claim is the single place the secret exists in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Raw refresh secret, hex-encoded
    pub secret: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID
    pub jti: String,
}

impl RefreshClaims {
    /// Creates claims for a new refresh token
    pub fn new(user_id: Uuid, secret: String, ttl_days: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::days(ttl_days);

        Self {
            sub: user_id.to_string(),
            secret,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: JWT_ISSUER.to_string(),
            aud: JWT_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Parses the subject back into a user ID
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Expiry claim as a UTC timestamp, if representable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Persisted refresh-token record.
///
/// Records are revoked, never deleted; `revoked_at` flips exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// Salted hash of the raw refresh secret; the secret itself is never stored
    pub token_hash: String,

    /// Hash of the client user-agent captured at issuance
    pub user_agent_hash: String,

    /// Hash of the client IP captured at issuance
    pub ip_hash: String,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Expiry copied from the signed token's own claim
    pub expires_at: DateTime<Utc>,

    /// Set once when the token is revoked (rotation, logout, or bulk revoke)
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Creates a new active record
    pub fn new(
        user_id: Uuid,
        token_hash: String,
        user_agent_hash: String,
        ip_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            user_agent_hash,
            ip_hash,
            created_at: Utc::now(),
            expires_at,
            revoked_at: None,
        }
    }

    /// Whether the record has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Whether the record has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Valid for rotation: not revoked and not expired
    pub fn is_active(&self) -> bool {
        !self.is_revoked() && !self.is_expired()
    }

    /// Marks the record revoked at the current instant
    pub fn revoke(&mut self) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(Utc::now());
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}
