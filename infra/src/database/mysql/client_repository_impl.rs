//! MySQL implementation of the ClientRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use quill_core::domain::entities::client::AuthorizationClient;
use quill_core::errors::{DomainError, DomainResult};
use quill_core::repositories::ClientRepository;

use super::map_sqlx_error;

/// MySQL implementation of ClientRepository
pub struct MySqlClientRepository {
    pool: MySqlPool,
}

impl MySqlClientRepository {
    /// Create a new MySQL client repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_client(row: &sqlx::mysql::MySqlRow) -> DomainResult<AuthorizationClient> {
        let id: String = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("client id", e))?;

        Ok(AuthorizationClient {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid client UUID: {}", e),
            })?,
            name: row
                .try_get("name")
                .map_err(|e| map_sqlx_error("client name", e))?,
            client_id: row
                .try_get("client_id")
                .map_err(|e| map_sqlx_error("client client_id", e))?,
            client_secret: row
                .try_get("client_secret")
                .map_err(|e| map_sqlx_error("client client_secret", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| map_sqlx_error("client created_at", e))?,
        })
    }
}

#[async_trait]
impl ClientRepository for MySqlClientRepository {
    async fn create(&self, client: AuthorizationClient) -> DomainResult<AuthorizationClient> {
        let query = r#"
            INSERT INTO authorization_clients (
                id, name, client_id, client_secret, created_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(client.id.to_string())
            .bind(&client.name)
            .bind(&client.client_id)
            .bind(&client.client_secret)
            .bind(client.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create client", e))?;

        Ok(client)
    }

    async fn find_by_client_id(
        &self,
        client_id: &str,
    ) -> DomainResult<Option<AuthorizationClient>> {
        let query = r#"
            SELECT id, name, client_id, client_secret, created_at
            FROM authorization_clients
            WHERE client_id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find client by client_id", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<AuthorizationClient>> {
        let query = r#"
            SELECT id, name, client_id, client_secret, created_at
            FROM authorization_clients
            WHERE name = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find client by name", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_client(&row)?)),
            None => Ok(None),
        }
    }
}
