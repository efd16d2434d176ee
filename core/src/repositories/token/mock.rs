//! In-memory implementation of TokenRepository for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// Mock token repository backed by a map keyed on the secret hash
pub struct MockTokenRepository {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
}

impl MockTokenRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Snapshot of every stored record, for assertions
    pub async fn all_records(&self) -> Vec<RefreshTokenRecord> {
        self.records.read().await.values().cloned().collect()
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.token_hash) {
            return Err(DomainError::Validation {
                message: "token hash already exists".to_string(),
            });
        }

        records.insert(record.token_hash.clone(), record.clone());
        Ok(record)
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .get(token_hash)
            .filter(|r| !r.is_revoked())
            .cloned())
    }

    async fn revoke_by_hash(&self, token_hash: &str) -> Result<bool, DomainError> {
        // Test-and-set under the write lock: only one caller observes the
        // active -> revoked transition.
        let mut records = self.records.write().await;
        match records.get_mut(token_hash) {
            Some(record) if !record.is_revoked() => {
                record.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let now = Utc::now();
        let mut count = 0;

        for record in records.values_mut() {
            if record.user_id == user_id && !record.is_revoked() {
                record.revoked_at = Some(now);
                count += 1;
            }
        }

        Ok(count)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}
