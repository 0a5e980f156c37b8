//! Authorization client repository trait.

use async_trait::async_trait;

use crate::domain::entities::client::AuthorizationClient;
use crate::errors::DomainResult;

/// Repository trait for AuthorizationClient persistence.
///
/// Clients are provisioned once and read-only afterwards; there is
/// deliberately no update or delete operation.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Persist a newly provisioned client
    async fn create(&self, client: AuthorizationClient) -> DomainResult<AuthorizationClient>;

    /// Find a client by its public client identifier
    async fn find_by_client_id(
        &self,
        client_id: &str,
    ) -> DomainResult<Option<AuthorizationClient>>;

    /// Find a client by its allow-list name
    async fn find_by_name(&self, name: &str) -> DomainResult<Option<AuthorizationClient>>;
}
