//! Value objects shared across services.

pub mod auth_response;
pub mod metadata;

pub use auth_response::{AuthResponse, UserSummary};
pub use metadata::ClientMetadata;
