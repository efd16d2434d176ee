//! Repository interfaces for persistence, with in-memory mocks for testing.

pub mod token;
pub mod user;

pub use token::{MockTokenRepository, TokenRepository};
pub use user::{MockUserRepository, UserRepository};
