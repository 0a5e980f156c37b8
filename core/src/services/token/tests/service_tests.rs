//! Tests for the token family manager.

use std::sync::Arc;

use crate::domain::entities::role::Role;
use crate::domain::entities::token::TokenKind;
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::token::{MockTokenRepository, TokenRepository};
use crate::services::token::service::hash_token;
use crate::services::token::{KeyCategory, TokenService, TokenServiceConfig};

fn service() -> (Arc<MockTokenRepository>, TokenService<MockTokenRepository>) {
    let repository = Arc::new(MockTokenRepository::new());
    let service = TokenService::new(Arc::clone(&repository), TokenServiceConfig::default());
    (repository, service)
}

fn user() -> User {
    User::new("a@x.com", "bcrypt-hash")
}

#[tokio::test]
async fn test_issue_exchange_code_persists_one_record() {
    let (repository, service) = service();
    let user = user();
    let family = service.create_family(user.id).await.unwrap();

    let code = service
        .issue_exchange_code(&user, family.id, "client-1")
        .await
        .unwrap();

    assert_eq!(repository.token_count().await, 1);

    let record = repository
        .find_token(TokenKind::ExchangeCode, &hash_token(&code))
        .await
        .unwrap()
        .expect("code record persisted");
    assert_eq!(record.family_id, family.id);
    assert!(record.is_valid);

    // The code's claims are bound to the family and the client
    let claims = service
        .codec()
        .verify(&code, KeyCategory::ExchangeCode)
        .unwrap();
    assert_eq!(claims.family_id(), Some(family.id));
    assert_eq!(claims.cid.as_deref(), Some("client-1"));
    assert_eq!(claims.user_id().unwrap(), user.id);
}

#[tokio::test]
async fn test_issue_pair_persists_single_valid_refresh_record() {
    let (repository, service) = service();
    let user = user();
    let family = service.create_family(user.id).await.unwrap();

    let pair = service.issue_pair(&user, family.id).await.unwrap();

    // Only the refresh token hits storage; the access token is stateless
    assert_eq!(repository.token_count().await, 1);

    let record = repository
        .find_token(TokenKind::Refresh, &hash_token(&pair.refresh_token))
        .await
        .unwrap()
        .expect("refresh record persisted");
    assert!(record.is_valid);
    assert_eq!(record.family_id, family.id);
}

#[tokio::test]
async fn test_access_token_verifies_and_carries_roles() {
    let (_repository, service) = service();
    let mut user = user();
    user.grant_role(Role::Editor);
    let family = service.create_family(user.id).await.unwrap();

    let pair = service.issue_pair(&user, family.id).await.unwrap();
    let claims = service.verify_access_token(&pair.access_token).unwrap();

    assert_eq!(claims.user_id().unwrap(), user.id);
    assert_eq!(claims.family_id(), Some(family.id));
    assert!(claims.roles.contains(&Role::Editor));
    assert!(claims.roles.contains(&Role::Reader));
}

#[tokio::test]
async fn test_access_token_never_verifies_as_refresh() {
    let (_repository, service) = service();
    let user = user();
    let family = service.create_family(user.id).await.unwrap();
    let pair = service.issue_pair(&user, family.id).await.unwrap();

    let err = service
        .codec()
        .verify(&pair.access_token, KeyCategory::Refresh)
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidTokenFormat)
    ));
}

#[tokio::test]
async fn test_revoke_family_cascades_records() {
    let (repository, service) = service();
    let user = user();
    let family = service.create_family(user.id).await.unwrap();
    service
        .issue_exchange_code(&user, family.id, "client-1")
        .await
        .unwrap();
    service.issue_pair(&user, family.id).await.unwrap();
    assert_eq!(repository.token_count().await, 2);

    assert!(service.revoke_family(family.id).await.unwrap());
    assert_eq!(repository.token_count().await, 0);
    assert!(!service.revoke_family(family.id).await.unwrap());
}

#[tokio::test]
async fn test_revoke_user_families_spares_other_users() {
    let (repository, service) = service();
    let alice = User::new("alice@x.com", "hash");
    let bob = User::new("bob@x.com", "hash");

    let f1 = service.create_family(alice.id).await.unwrap();
    let f2 = service.create_family(alice.id).await.unwrap();
    let f3 = service.create_family(bob.id).await.unwrap();
    service.issue_pair(&alice, f1.id).await.unwrap();
    service.issue_pair(&alice, f2.id).await.unwrap();
    service.issue_pair(&bob, f3.id).await.unwrap();

    let revoked = service.revoke_user_families(alice.id).await.unwrap();
    assert_eq!(revoked, 2);
    assert_eq!(repository.family_count().await, 1);
    assert_eq!(repository.token_count().await, 1);
}

#[tokio::test]
async fn test_password_reset_token_round_trip() {
    let (_repository, service) = service();
    let user = user();

    let token = service.issue_password_reset_token(&user).unwrap();
    let claims = service.verify_password_reset_token(&token).unwrap();

    assert_eq!(claims.user_id().unwrap(), user.id);
    assert!(claims.fam.is_none());
}

#[tokio::test]
async fn test_password_reset_token_rejected_for_access() {
    let (_repository, service) = service();
    let user = user();
    let token = service.issue_password_reset_token(&user).unwrap();

    assert!(service.verify_access_token(&token).is_err());
}

#[tokio::test]
async fn test_cleanup_removes_expired_tombstones() {
    let repository = Arc::new(MockTokenRepository::new());
    // Tokens born already expired (past the signing leeway)
    let mut config = TokenServiceConfig::default();
    config.refresh_token_expiry = -120;
    let service = TokenService::new(Arc::clone(&repository), config);

    let user = user();
    let family = service.create_family(user.id).await.unwrap();
    let pair = service.issue_pair(&user, family.id).await.unwrap();
    repository
        .invalidate_refresh_token(&hash_token(&pair.refresh_token))
        .await
        .unwrap();

    let deleted = service.cleanup_expired_tokens().await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(repository.token_count().await, 0);
}
