//! Mock implementation of ClientRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::client::AuthorizationClient;
use crate::errors::{DomainError, DomainResult};

use super::r#trait::ClientRepository;

/// Mock client repository for testing
#[derive(Clone)]
pub struct MockClientRepository {
    clients: Arc<RwLock<HashMap<Uuid, AuthorizationClient>>>,
}

impl MockClientRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MockClientRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientRepository for MockClientRepository {
    async fn create(&self, client: AuthorizationClient) -> DomainResult<AuthorizationClient> {
        let mut clients = self.clients.write().await;

        if clients
            .values()
            .any(|c| c.name == client.name || c.client_id == client.client_id)
        {
            return Err(DomainError::Validation {
                message: "Client already exists".to_string(),
            });
        }

        clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn find_by_client_id(
        &self,
        client_id: &str,
    ) -> DomainResult<Option<AuthorizationClient>> {
        let clients = self.clients.read().await;
        Ok(clients.values().find(|c| c.client_id == client_id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<AuthorizationClient>> {
        let clients = self.clients.read().await;
        Ok(clients.values().find(|c| c.name == name).cloned())
    }
}
