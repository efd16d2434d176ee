//! User repository trait defining the interface for user persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository contract for user identities.
///
/// The subsystem reads identities and creates/updates customers on OTP
/// login; admin accounts are provisioned out-of-band (seed script).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by phone number (exact E.164 match).
    ///
    /// Admin logins resolve the username through this same lookup.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError)` - Creation failed (e.g., duplicate phone)
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user (name, last-login stamp)
    async fn update(&self, user: User) -> Result<User, DomainError>;
}
