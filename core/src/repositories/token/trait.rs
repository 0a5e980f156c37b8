//! Token repository trait: persistence for token families and token records.
//!
//! The protocol's concurrency guarantees rest on two primitives here:
//! `consume_exchange_code` (a conditional delete: of two concurrent
//! redemptions exactly one observes `true`) and `invalidate_refresh_token`
//! (a compare-and-swap on the `is_valid` flag: of two concurrent rotations
//! exactly one observes `true`). Implementations must provide both as
//! single atomic storage operations, never as read-then-write sequences.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::{TokenFamily, TokenKind, TokenRecord};
use crate::errors::DomainResult;

/// Repository trait for TokenFamily and TokenRecord persistence
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new token family
    async fn create_family(&self, family: TokenFamily) -> DomainResult<TokenFamily>;

    /// Find a token family by ID
    async fn find_family(&self, id: Uuid) -> DomainResult<Option<TokenFamily>>;

    /// Delete a family and every token record it owns (cascade)
    ///
    /// # Returns
    /// * `Ok(true)` - Family existed and was deleted
    /// * `Ok(false)` - No such family
    async fn delete_family(&self, id: Uuid) -> DomainResult<bool>;

    /// Delete every family owned by a user (cascade)
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of families deleted
    async fn delete_user_families(&self, user_id: Uuid) -> DomainResult<usize>;

    /// Persist a new token record
    ///
    /// Fails if the owning family no longer exists, so a rotation racing a
    /// family deletion observes the deletion instead of resurrecting the
    /// lineage.
    async fn save_token(&self, record: TokenRecord) -> DomainResult<TokenRecord>;

    /// Find a token record by kind and hash
    async fn find_token(
        &self,
        kind: TokenKind,
        token_hash: &str,
    ) -> DomainResult<Option<TokenRecord>>;

    /// Atomically consume (delete) an exchange-code record
    ///
    /// The single-use guarantee: of two concurrent calls with the same hash,
    /// exactly one returns `Ok(true)`.
    async fn consume_exchange_code(&self, token_hash: &str) -> DomainResult<bool>;

    /// Atomically flip a refresh record's `is_valid` flag from true to false
    ///
    /// # Returns
    /// * `Ok(true)` - This caller performed the transition
    /// * `Ok(false)` - Record missing, not a refresh token, or already invalid
    async fn invalidate_refresh_token(&self, token_hash: &str) -> DomainResult<bool>;

    /// Delete a single token record by hash
    async fn delete_token(&self, token_hash: &str) -> DomainResult<bool>;

    /// Delete expired records: stale exchange codes, expired refresh tokens,
    /// and tombstones whose signed expiry has passed
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn delete_expired_tokens(&self) -> DomainResult<usize>;
}
