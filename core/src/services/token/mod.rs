//! Token service module: the subsystem's trust anchor.
//!
//! Handles minting, verifying, rotating, and revoking token pairs:
//! - JWT signing/verification behind the `TokenCodec` port
//! - Refresh-secret hashing (the raw secret is never persisted)
//! - Single-use rotation arbitration via the repository's atomic revoke

mod codec;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use codec::{JwtCodec, TokenCodec};
pub use config::TokenServiceConfig;
pub use service::{TokenService, VerifiedAccess};
