//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::{TokenFamily, TokenKind, TokenRecord};
use crate::errors::{DomainError, DomainResult};

use super::r#trait::TokenRepository;

/// Mock token repository for testing.
///
/// A single `RwLock` guards both maps, so the conditional-delete and
/// compare-and-swap operations are atomic exactly as the trait requires.
#[derive(Clone)]
pub struct MockTokenRepository {
    inner: Arc<RwLock<Store>>,
}

#[derive(Default)]
struct Store {
    families: HashMap<Uuid, TokenFamily>,
    /// Keyed by token hash
    tokens: HashMap<String, TokenRecord>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Store::default())),
        }
    }

    /// Number of stored token records (test helper)
    pub async fn token_count(&self) -> usize {
        self.inner.read().await.tokens.len()
    }

    /// Number of stored families (test helper)
    pub async fn family_count(&self) -> usize {
        self.inner.read().await.families.len()
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn create_family(&self, family: TokenFamily) -> DomainResult<TokenFamily> {
        let mut store = self.inner.write().await;
        store.families.insert(family.id, family.clone());
        Ok(family)
    }

    async fn find_family(&self, id: Uuid) -> DomainResult<Option<TokenFamily>> {
        let store = self.inner.read().await;
        Ok(store.families.get(&id).cloned())
    }

    async fn delete_family(&self, id: Uuid) -> DomainResult<bool> {
        let mut store = self.inner.write().await;
        let existed = store.families.remove(&id).is_some();
        if existed {
            store.tokens.retain(|_, t| t.family_id != id);
        }
        Ok(existed)
    }

    async fn delete_user_families(&self, user_id: Uuid) -> DomainResult<usize> {
        let mut store = self.inner.write().await;
        let ids: Vec<Uuid> = store
            .families
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.id)
            .collect();

        for id in &ids {
            store.families.remove(id);
        }
        store.tokens.retain(|_, t| !ids.contains(&t.family_id));

        Ok(ids.len())
    }

    async fn save_token(&self, record: TokenRecord) -> DomainResult<TokenRecord> {
        let mut store = self.inner.write().await;

        if !store.families.contains_key(&record.family_id) {
            return Err(DomainError::NotFound {
                resource: format!("token family {}", record.family_id),
            });
        }
        if store.tokens.contains_key(&record.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        store.tokens.insert(record.token_hash.clone(), record.clone());
        Ok(record)
    }

    async fn find_token(
        &self,
        kind: TokenKind,
        token_hash: &str,
    ) -> DomainResult<Option<TokenRecord>> {
        let store = self.inner.read().await;
        Ok(store
            .tokens
            .get(token_hash)
            .filter(|t| t.kind == kind)
            .cloned())
    }

    async fn consume_exchange_code(&self, token_hash: &str) -> DomainResult<bool> {
        let mut store = self.inner.write().await;
        match store.tokens.get(token_hash) {
            Some(t) if t.kind == TokenKind::ExchangeCode => {
                store.tokens.remove(token_hash);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn invalidate_refresh_token(&self, token_hash: &str) -> DomainResult<bool> {
        let mut store = self.inner.write().await;
        match store.tokens.get_mut(token_hash) {
            Some(t) if t.kind == TokenKind::Refresh && t.is_valid => {
                t.invalidate();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_token(&self, token_hash: &str) -> DomainResult<bool> {
        let mut store = self.inner.write().await;
        Ok(store.tokens.remove(token_hash).is_some())
    }

    async fn delete_expired_tokens(&self) -> DomainResult<usize> {
        let mut store = self.inner.write().await;
        let initial = store.tokens.len();
        store.tokens.retain(|_, t| !t.is_expired());
        Ok(initial - store.tokens.len())
    }
}
