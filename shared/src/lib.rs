//! Shared utilities and common types for the Savora server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Common response structures
//! - Utility functions (phone validation, masking, etc.)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, ServerConfig, SmsConfig};
pub use types::ApiResponse;
pub use utils::phone;
