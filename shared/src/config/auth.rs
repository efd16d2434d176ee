//! Authentication and token configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Minimum length for JWT signing secrets, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Minimum length for the refresh-token hash salt, in bytes
pub const MIN_SALT_LEN: usize = 16;

/// Token signing and lifetime configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret for signing access tokens (HS256)
    pub access_secret: String,

    /// Secret for signing refresh tokens (HS256), independent of the access secret
    pub refresh_secret: String,

    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_ttl_days: i64,

    /// Server-side salt mixed into the refresh-secret hash before storage
    pub refresh_token_salt: String,

    /// Bootstrap admin password; login compares against it to raise the
    /// "must change password" advisory flag
    pub admin_default_password: String,
}

impl AuthConfig {
    /// Create from environment variables, validating secret lengths
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_secret = require("JWT_ACCESS_SECRET")?;
        let refresh_secret = require("JWT_REFRESH_SECRET")?;
        let refresh_token_salt = require("REFRESH_TOKEN_SALT")?;
        let admin_default_password = require("ADMIN_DEFAULT_PASSWORD")?;

        let config = Self {
            access_secret,
            refresh_secret,
            access_ttl_minutes: parse_or("JWT_ACCESS_TTL_MINUTES", 15)?,
            refresh_ttl_days: parse_or("JWT_REFRESH_TTL_DAYS", 30)?,
            refresh_token_salt,
            admin_default_password,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate secret strength requirements
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidVar {
                name: "JWT_ACCESS_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }
        if self.refresh_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidVar {
                name: "JWT_REFRESH_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }
        if self.refresh_token_salt.len() < MIN_SALT_LEN {
            return Err(ConfigError::InvalidVar {
                name: "REFRESH_TOKEN_SALT",
                reason: format!("must be at least {} bytes", MIN_SALT_LEN),
            });
        }
        if self.access_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidVar {
                name: "JWT_ACCESS_TTL_MINUTES",
                reason: "must be positive".to_string(),
            });
        }
        if self.refresh_ttl_days <= 0 {
            return Err(ConfigError::InvalidVar {
                name: "JWT_REFRESH_TTL_DAYS",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Access token lifetime in seconds
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_minutes * 60
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar { name })
}

fn parse_or(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            name,
            reason: format!("expected an integer, got {:?}", raw),
        }),
        Err(_) => Ok(default),
    }
}
