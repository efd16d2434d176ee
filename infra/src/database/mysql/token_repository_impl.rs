//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh-token records are append-then-revoke: no query here deletes a
//! row. Revocation is a conditional UPDATE on `revoked_at IS NULL`, so the
//! database arbitrates concurrent rotations of the same token — exactly one
//! caller sees `rows_affected() == 1`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sv_core::domain::entities::token::RefreshTokenRecord;
use sv_core::errors::DomainError;
use sv_core::repositories::TokenRepository;

/// MySQL-backed refresh-token repository
pub struct MySqlTokenRepository {
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new repository over a connection pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        let id: String = row.try_get("id").map_err(db_err)?;
        let user_id: String = row.try_get("user_id").map_err(db_err)?;

        Ok(RefreshTokenRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Database {
                message: format!("invalid token record UUID: {e}"),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Database {
                message: format!("invalid user UUID: {e}"),
            })?,
            token_hash: row.try_get("token_hash").map_err(db_err)?,
            user_agent_hash: row.try_get("user_agent_hash").map_err(db_err)?,
            ip_hash: row.try_get("ip_hash").map_err(db_err)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(db_err)?,
            expires_at: row.try_get::<DateTime<Utc>, _>("expires_at").map_err(db_err)?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(db_err)?,
        })
    }
}

fn db_err(e: sqlx::Error) -> DomainError {
    DomainError::Database {
        message: e.to_string(),
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_hash, user_agent_hash, ip_hash,
                created_at, expires_at, revoked_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(&record.token_hash)
            .bind(&record.user_agent_hash)
            .bind(&record.ip_hash)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.revoked_at)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(record)
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, user_agent_hash, ip_hash,
                   created_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token_hash = ? AND revoked_at IS NULL
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke_by_hash(&self, token_hash: &str) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = ?
            WHERE token_hash = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = ?
            WHERE user_id = ? AND revoked_at IS NULL
        "#;

        let result = sqlx::query(query)
            .bind(Utc::now())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() as usize)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<RefreshTokenRecord>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, user_agent_hash, ip_hash,
                   created_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE user_id = ?
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(Self::row_to_record(&row)?);
        }

        Ok(records)
    }
}
