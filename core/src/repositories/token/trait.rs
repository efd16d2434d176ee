//! Token repository trait defining the interface for refresh-token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository contract for refresh-token records.
///
/// Records are append-then-revoke: nothing here deletes a row, revocation
/// flips `revoked_at` exactly once and the row stays behind for audit.
///
/// # Concurrency
/// `revoke_by_hash` is the rotation race arbiter: it must atomically
/// test-and-set the revocation flag and return `true` only for the single
/// caller that performed the transition. Two concurrent rotations of the same
/// token therefore see one `true` and one `false`.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new refresh-token record
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The stored record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate hash)
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError>;

    /// Find the non-revoked record matching a secret hash
    ///
    /// Revoked records are excluded at the query level; expiry is checked by
    /// the caller so the error surface stays uniform.
    async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Atomically revoke the record matching a secret hash
    ///
    /// # Returns
    /// * `Ok(true)` - This call transitioned the record to revoked
    /// * `Ok(false)` - No active record matched (missing or already revoked)
    async fn revoke_by_hash(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Revoke every active record belonging to a user
    ///
    /// Idempotent; returns the number of records transitioned by this call.
    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// Find all records for a user, regardless of state
    ///
    /// Used by tests and administrative review.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>, DomainError>;
}
