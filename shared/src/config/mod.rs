//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing secrets, lifetimes, and the admin bootstrap password
//! - `database` - Database connection and pool configuration
//! - `server` - HTTP server bind configuration
//! - `sms` - SMS delivery provider selection
//!
//! Everything is read from the environment at startup and validated once;
//! a misconfigured deployment fails before the server binds.

pub mod auth;
pub mod database;
pub mod server;
pub mod sms;

use thiserror::Error;

// Re-export commonly used types
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;
pub use sms::{SmsConfig, SmsProviderKind};

/// Configuration loading/validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {name}")]
    MissingVar { name: &'static str },

    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server bind configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// SMS delivery configuration
    pub sms: SmsConfig,
}

impl AppConfig {
    /// Load and validate the full configuration from the environment.
    ///
    /// Call once at startup, after `dotenvy` has populated the process
    /// environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            sms: SmsConfig::from_env()?,
        })
    }
}
