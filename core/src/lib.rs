//! # Savora Core
//!
//! Core business logic and domain layer for the Savora backend.
//! This crate contains domain entities, the session/identity services
//! (OTP ledger, token service, credential verifier, auth facade),
//! repository interfaces, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
