//! Refresh rotation engine: validate, rotate, and detect reuse.
//!
//! The states of a refresh token are `unknown` (no record) -> `valid`
//! (exactly one per family) -> `rotated` (tombstone, flag false) ->
//! `family-deleted` (record gone). Rotation moves a token from `valid` to
//! `rotated` and mints its successor; presenting a `rotated` token again is
//! the theft signal that kills the whole family.

use std::sync::Arc;

use tracing::warn;

use crate::domain::entities::token::{TokenKind, TokenPair};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};

use super::codec::KeyCategory;
use super::service::{hash_token, TokenService};

/// Engine performing refresh-token rotation for a token service
pub struct RotationEngine<R: TokenRepository, U: UserRepository> {
    token_service: Arc<TokenService<R>>,
    user_repository: Arc<U>,
}

impl<R: TokenRepository, U: UserRepository> RotationEngine<R, U> {
    /// Creates a new rotation engine
    pub fn new(token_service: Arc<TokenService<R>>, user_repository: Arc<U>) -> Self {
        Self {
            token_service,
            user_repository,
        }
    }

    /// Rotates a refresh token: invalidates it and returns its successor
    /// pair, or revokes the entire family when reuse is detected.
    ///
    /// # Errors
    /// * `TokenError::InvalidOrExpiredToken` - Unknown, expired, or
    ///   malformed token, or the owning family/user is gone
    /// * `TokenError::TokenReuseDetected` - An already-rotated token was
    ///   presented; the family has been revoked and the caller must log in
    ///   again
    pub async fn rotate(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let repository = &self.token_service.repository;
        let token_hash = hash_token(refresh_token);

        // Step 1: the persisted record must exist
        let record = match repository.find_token(TokenKind::Refresh, &token_hash).await? {
            Some(record) => record,
            None => return Err(TokenError::InvalidOrExpiredToken.into()),
        };

        // Step 2: signature and expiry. An unverifiable token can never be
        // trusted even though a record exists; the record is deleted eagerly.
        let claims = match self
            .token_service
            .codec()
            .verify(refresh_token, KeyCategory::Refresh)
        {
            Ok(claims) => claims,
            Err(_) => {
                if let Err(e) = repository.delete_token(&token_hash).await {
                    warn!(error = %e, "failed to delete unverifiable refresh token");
                }
                return Err(TokenError::InvalidOrExpiredToken.into());
            }
        };

        // The family inside the signed claims must match the record
        if claims.family_id() != Some(record.family_id) {
            if let Err(e) = repository.delete_token(&token_hash).await {
                warn!(error = %e, "failed to delete mismatched refresh token");
            }
            return Err(TokenError::InvalidOrExpiredToken.into());
        }

        // Step 3: reuse check. A tombstoned token presented again means the
        // token was stolen at some point; revoke the whole lineage.
        if !record.is_valid {
            warn!(
                family_id = %record.family_id,
                "refresh token reuse detected, revoking token family"
            );
            if let Err(e) = repository.delete_family(record.family_id).await {
                warn!(error = %e, "failed to revoke family after reuse detection");
            }
            return Err(TokenError::TokenReuseDetected.into());
        }

        // Step 4: claim the rotation. Losing the compare-and-swap means a
        // concurrent caller already spent this token, which is the same
        // signal as reuse.
        if !repository.invalidate_refresh_token(&token_hash).await? {
            warn!(
                family_id = %record.family_id,
                "concurrent rotation of the same refresh token, revoking token family"
            );
            if let Err(e) = repository.delete_family(record.family_id).await {
                warn!(error = %e, "failed to revoke family after rotation race");
            }
            return Err(TokenError::TokenReuseDetected.into());
        }

        // Resolve the owning user; a deleted family or user fails closed.
        let family = repository
            .find_family(record.family_id)
            .await?
            .ok_or(TokenError::InvalidOrExpiredToken)?;
        let user = self
            .user_repository
            .find_by_id(family.user_id)
            .await?
            .ok_or(TokenError::InvalidOrExpiredToken)?;

        // The old record stays behind as the tombstone; the new refresh
        // token becomes the family's single valid one. A family deleted
        // between the swap and the save fails closed.
        match self.token_service.issue_pair(&user, family.id).await {
            Err(DomainError::NotFound { .. }) => Err(TokenError::InvalidOrExpiredToken.into()),
            other => other,
        }
    }
}
