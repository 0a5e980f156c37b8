//! Token family manager: the lifecycle of one login session's tokens.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::token::{Claims, TokenFamily, TokenKind, TokenPair, TokenRecord};
use crate::domain::entities::user::User;
use crate::errors::{DomainResult, TokenError};
use crate::repositories::TokenRepository;

use super::codec::{KeyCategory, TokenCodec};
use super::config::TokenServiceConfig;

/// Hashes a token string for storage lookup. Records never hold the token
/// string itself.
pub(crate) fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Service owning token families and the tokens issued into them.
///
/// One family is created per successful login; every exchange code and
/// refresh token descends from it, and deleting the family revokes the
/// whole lineage at once.
pub struct TokenService<R: TokenRepository> {
    pub(crate) repository: Arc<R>,
    codec: TokenCodec,
    config: TokenServiceConfig,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service instance
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Self {
        let codec = TokenCodec::new(&config);
        Self {
            repository,
            codec,
            config,
        }
    }

    /// The codec used for signing and verification
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// The token configuration
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Creates a new token family for a user
    pub async fn create_family(&self, user_id: Uuid) -> DomainResult<TokenFamily> {
        self.repository.create_family(TokenFamily::new(user_id)).await
    }

    /// Issues a short-lived, single-use exchange code bound to a family and
    /// a client, persisting its record
    pub async fn issue_exchange_code(
        &self,
        user: &User,
        family_id: Uuid,
        client_id: &str,
    ) -> DomainResult<String> {
        let claims = Claims::new_exchange_code(
            user.id,
            family_id,
            client_id,
            self.config.exchange_code_expiry,
            &self.config.issuer,
            &self.config.audience,
        );
        let code = self.codec.issue(&claims, KeyCategory::ExchangeCode)?;

        let record = TokenRecord::new(
            TokenKind::ExchangeCode,
            family_id,
            hash_token(&code),
            claims.expires_at(),
        );
        self.repository.save_token(record).await?;

        Ok(code)
    }

    /// Issues an access/refresh pair for a family.
    ///
    /// The access token is stateless; the refresh token is persisted as the
    /// family's single valid refresh record. Used once per family right
    /// after code redemption, and again on every rotation.
    pub async fn issue_pair(&self, user: &User, family_id: Uuid) -> DomainResult<TokenPair> {
        let access_claims = Claims::new_access_token(
            user.id,
            family_id,
            user.roles.iter().collect(),
            self.config.access_token_expiry,
            &self.config.issuer,
            &self.config.audience,
        );
        let access_token = self.codec.issue(&access_claims, KeyCategory::Access)?;

        let refresh_claims = Claims::new_refresh_token(
            user.id,
            family_id,
            self.config.refresh_token_expiry,
            &self.config.issuer,
            &self.config.audience,
        );
        let refresh_token = self.codec.issue(&refresh_claims, KeyCategory::Refresh)?;

        let record = TokenRecord::new(
            TokenKind::Refresh,
            family_id,
            hash_token(&refresh_token),
            refresh_claims.expires_at(),
        );
        self.repository.save_token(record).await?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_expiry,
            self.config.refresh_token_expiry,
        ))
    }

    /// Issues a password-reset token for a user
    pub fn issue_password_reset_token(&self, user: &User) -> DomainResult<String> {
        let claims = Claims::new_password_reset(
            user.id,
            self.config.password_reset_expiry,
            &self.config.issuer,
            &self.config.audience,
        );
        self.codec.issue(&claims, KeyCategory::PasswordReset)
    }

    /// Verifies a password-reset token
    pub fn verify_password_reset_token(&self, token: &str) -> DomainResult<Claims> {
        self.codec
            .verify(token, KeyCategory::PasswordReset)
            .map_err(|_| TokenError::InvalidOrExpiredToken.into())
    }

    /// Verifies an access token: pure signature/expiry check against the
    /// access key, no storage lookup. Revocation latency equals the access
    /// expiry window.
    pub fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        self.codec.verify(token, KeyCategory::Access)
    }

    /// Deletes a family and every token it owns
    pub async fn revoke_family(&self, family_id: Uuid) -> DomainResult<bool> {
        let deleted = self.repository.delete_family(family_id).await?;
        if deleted {
            info!(family_id = %family_id, "token family revoked");
        }
        Ok(deleted)
    }

    /// Deletes every family a user owns. Called on password change, where
    /// every session must die with the old password.
    pub async fn revoke_user_families(&self, user_id: Uuid) -> DomainResult<usize> {
        let revoked = self.repository.delete_user_families(user_id).await?;
        if revoked > 0 {
            info!(user_id = %user_id, families = revoked, "all token families revoked");
        }
        Ok(revoked)
    }

    /// Removes expired records: stale exchange codes, expired refresh
    /// tokens, and tombstones whose signed expiry has passed. A tombstone
    /// only matters while the token string it tombstones could still
    /// verify, so the retention window equals the token's own lifetime.
    pub async fn cleanup_expired_tokens(&self) -> DomainResult<usize> {
        self.repository.delete_expired_tokens().await
    }
}
