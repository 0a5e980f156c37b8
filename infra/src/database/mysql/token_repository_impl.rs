//! MySQL implementation of the TokenRepository trait.
//!
//! The two protocol-critical operations are expressed as single atomic
//! statements judged by `rows_affected`: `consume_exchange_code` is a
//! conditional `DELETE`, `invalidate_refresh_token` a conditional `UPDATE`
//! guarded on `is_valid = TRUE`. Two concurrent callers therefore always
//! observe exactly one winner without any explicit locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use quill_core::domain::entities::token::{TokenFamily, TokenKind, TokenRecord};
use quill_core::errors::{DomainError, DomainResult};
use quill_core::repositories::TokenRepository;

use super::map_sqlx_error;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_family(row: &sqlx::mysql::MySqlRow) -> DomainResult<TokenFamily> {
        let id: String = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("token family id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| map_sqlx_error("token family user_id", e))?;

        Ok(TokenFamily {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| map_sqlx_error("token family created_at", e))?,
        })
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> DomainResult<TokenRecord> {
        let id: String = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("token id", e))?;
        let kind: String = row
            .try_get("kind")
            .map_err(|e| map_sqlx_error("token kind", e))?;
        let family_id: String = row
            .try_get("family_id")
            .map_err(|e| map_sqlx_error("token family_id", e))?;

        Ok(TokenRecord {
            id: parse_uuid(&id)?,
            kind: kind.parse().map_err(|e: String| DomainError::Internal { message: e })?,
            family_id: parse_uuid(&family_id)?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| map_sqlx_error("token hash", e))?,
            is_valid: row
                .try_get("is_valid")
                .map_err(|e| map_sqlx_error("token is_valid", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| map_sqlx_error("token created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| map_sqlx_error("token expires_at", e))?,
        })
    }
}

fn parse_uuid(value: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in storage: {}", e),
    })
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn create_family(&self, family: TokenFamily) -> DomainResult<TokenFamily> {
        let query = r#"
            INSERT INTO token_families (id, user_id, created_at)
            VALUES (?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(family.id.to_string())
            .bind(family.user_id.to_string())
            .bind(family.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create token family", e))?;

        Ok(family)
    }

    async fn find_family(&self, id: Uuid) -> DomainResult<Option<TokenFamily>> {
        let query = r#"
            SELECT id, user_id, created_at
            FROM token_families
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find token family", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_family(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_family(&self, id: Uuid) -> DomainResult<bool> {
        // Token rows go first, inside one transaction, so a concurrent
        // rotation can never observe a family without also observing the
        // cascade.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("delete family tx", e))?;

        sqlx::query("DELETE FROM login_tokens WHERE family_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete family tokens", e))?;

        let result = sqlx::query("DELETE FROM token_families WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete family row", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("delete family commit", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user_families(&self, user_id: Uuid) -> DomainResult<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("delete user families tx", e))?;

        sqlx::query(
            r#"
            DELETE FROM login_tokens
            WHERE family_id IN (SELECT id FROM token_families WHERE user_id = ?)
            "#,
        )
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("delete user family tokens", e))?;

        let result = sqlx::query("DELETE FROM token_families WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("delete user family rows", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("delete user families commit", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn save_token(&self, record: TokenRecord) -> DomainResult<TokenRecord> {
        let query = r#"
            INSERT INTO login_tokens (
                id, kind, family_id, token_hash, is_valid, created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        // A foreign-key violation here means the family was deleted out from
        // under us; map_sqlx_error reports it as NotFound and the caller
        // fails closed.
        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(record.kind.as_str())
            .bind(record.family_id.to_string())
            .bind(&record.token_hash)
            .bind(record.is_valid)
            .bind(record.created_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("save token", e))?;

        Ok(record)
    }

    async fn find_token(
        &self,
        kind: TokenKind,
        token_hash: &str,
    ) -> DomainResult<Option<TokenRecord>> {
        let query = r#"
            SELECT id, kind, family_id, token_hash, is_valid, created_at, expires_at
            FROM login_tokens
            WHERE kind = ? AND token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(kind.as_str())
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find token", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn consume_exchange_code(&self, token_hash: &str) -> DomainResult<bool> {
        let query = r#"
            DELETE FROM login_tokens
            WHERE token_hash = ? AND kind = 'code'
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("consume exchange code", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn invalidate_refresh_token(&self, token_hash: &str) -> DomainResult<bool> {
        let query = r#"
            UPDATE login_tokens
            SET is_valid = FALSE
            WHERE token_hash = ? AND kind = 'refresh' AND is_valid = TRUE
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("invalidate refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_token(&self, token_hash: &str) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM login_tokens WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired_tokens(&self) -> DomainResult<usize> {
        let result = sqlx::query("DELETE FROM login_tokens WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete expired tokens", e))?;

        Ok(result.rows_affected() as usize)
    }
}
