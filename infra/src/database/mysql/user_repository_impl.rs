//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use quill_core::domain::entities::role::RoleSet;
use quill_core::domain::entities::user::User;
use quill_core::errors::{DomainError, DomainResult};
use quill_core::repositories::UserRepository;

use super::map_sqlx_error;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> DomainResult<User> {
        let id: String = row.try_get("id").map_err(|e| map_sqlx_error("user id", e))?;
        let roles: String = row
            .try_get("roles")
            .map_err(|e| map_sqlx_error("user roles", e))?;

        Ok(User {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            email: row
                .try_get("email")
                .map_err(|e| map_sqlx_error("user email", e))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| map_sqlx_error("user password_hash", e))?,
            login_permitted: row
                .try_get("login_permitted")
                .map_err(|e| map_sqlx_error("user login_permitted", e))?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| map_sqlx_error("user is_active", e))?,
            email_verified: row
                .try_get("email_verified")
                .map_err(|e| map_sqlx_error("user email_verified", e))?,
            otp_secret: row
                .try_get("otp_secret")
                .map_err(|e| map_sqlx_error("user otp_secret", e))?,
            roles: roles
                .parse::<RoleSet>()
                .map_err(|e| DomainError::Internal {
                    message: format!("Invalid role set in storage: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| map_sqlx_error("user created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| map_sqlx_error("user updated_at", e))?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn create(&self, user: User) -> DomainResult<User> {
        let query = r#"
            INSERT INTO users (
                id, email, password_hash, login_permitted, is_active,
                email_verified, otp_secret, roles, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.login_permitted)
            .bind(user.is_active)
            .bind(user.email_verified)
            .bind(&user.otp_secret)
            .bind(user.roles.to_string())
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create user", e))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        let query = r#"
            SELECT id, email, password_hash, login_permitted, is_active,
                   email_verified, otp_secret, roles, created_at, updated_at
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find user by id", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let query = r#"
            SELECT id, email, password_hash, login_permitted, is_active,
                   email_verified, otp_secret, roles, created_at, updated_at
            FROM users
            WHERE email = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find user by email", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> DomainResult<bool> {
        let query = r#"
            UPDATE users
            SET password_hash = ?, updated_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(password_hash)
            .bind(Utc::now())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update password", e))?;

        Ok(result.rows_affected() > 0)
    }
}
