//! Tests for the mock token repository, with emphasis on the atomic
//! consume/invalidate primitives the rotation protocol depends on.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{TokenFamily, TokenKind, TokenRecord};
use crate::repositories::token::{MockTokenRepository, TokenRepository};

fn record(kind: TokenKind, family_id: Uuid, hash: &str) -> TokenRecord {
    TokenRecord::new(
        kind,
        family_id,
        hash.to_string(),
        Utc::now() + Duration::seconds(60),
    )
}

#[tokio::test]
async fn test_save_and_find_token() {
    let repo = MockTokenRepository::new();
    let family = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();

    repo.save_token(record(TokenKind::Refresh, family.id, "h1"))
        .await
        .unwrap();

    let found = repo.find_token(TokenKind::Refresh, "h1").await.unwrap();
    assert!(found.is_some());

    // Kind mismatch misses
    let miss = repo.find_token(TokenKind::ExchangeCode, "h1").await.unwrap();
    assert!(miss.is_none());
}

#[tokio::test]
async fn test_save_token_into_deleted_family_fails() {
    let repo = MockTokenRepository::new();
    let family = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();

    assert!(repo.delete_family(family.id).await.unwrap());

    let result = repo.save_token(record(TokenKind::Refresh, family.id, "h1")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_consume_exchange_code_exactly_once() {
    let repo = MockTokenRepository::new();
    let family = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();
    repo.save_token(record(TokenKind::ExchangeCode, family.id, "code-hash"))
        .await
        .unwrap();

    assert!(repo.consume_exchange_code("code-hash").await.unwrap());
    assert!(!repo.consume_exchange_code("code-hash").await.unwrap());
}

#[tokio::test]
async fn test_consume_does_not_touch_refresh_tokens() {
    let repo = MockTokenRepository::new();
    let family = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();
    repo.save_token(record(TokenKind::Refresh, family.id, "r-hash"))
        .await
        .unwrap();

    assert!(!repo.consume_exchange_code("r-hash").await.unwrap());
    assert!(repo.find_token(TokenKind::Refresh, "r-hash").await.unwrap().is_some());
}

#[tokio::test]
async fn test_invalidate_refresh_token_cas() {
    let repo = MockTokenRepository::new();
    let family = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();
    repo.save_token(record(TokenKind::Refresh, family.id, "r1"))
        .await
        .unwrap();

    // First transition wins, second loses
    assert!(repo.invalidate_refresh_token("r1").await.unwrap());
    assert!(!repo.invalidate_refresh_token("r1").await.unwrap());

    // Tombstone remains for reuse detection
    let tombstone = repo.find_token(TokenKind::Refresh, "r1").await.unwrap().unwrap();
    assert!(!tombstone.is_valid);
}

#[tokio::test]
async fn test_concurrent_invalidation_single_winner() {
    let repo = MockTokenRepository::new();
    let family = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();
    repo.save_token(record(TokenKind::Refresh, family.id, "r1"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.invalidate_refresh_token("r1").await.unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_delete_family_cascades() {
    let repo = MockTokenRepository::new();
    let family = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();
    repo.save_token(record(TokenKind::ExchangeCode, family.id, "c1"))
        .await
        .unwrap();
    repo.save_token(record(TokenKind::Refresh, family.id, "r1"))
        .await
        .unwrap();

    assert!(repo.delete_family(family.id).await.unwrap());
    assert_eq!(repo.token_count().await, 0);
    assert!(!repo.delete_family(family.id).await.unwrap());
}

#[tokio::test]
async fn test_delete_user_families() {
    let repo = MockTokenRepository::new();
    let user_id = Uuid::new_v4();

    let f1 = repo.create_family(TokenFamily::new(user_id)).await.unwrap();
    let f2 = repo.create_family(TokenFamily::new(user_id)).await.unwrap();
    let other = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();

    repo.save_token(record(TokenKind::Refresh, f1.id, "r1")).await.unwrap();
    repo.save_token(record(TokenKind::Refresh, f2.id, "r2")).await.unwrap();
    repo.save_token(record(TokenKind::Refresh, other.id, "r3")).await.unwrap();

    let deleted = repo.delete_user_families(user_id).await.unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(repo.family_count().await, 1);
    assert!(repo.find_token(TokenKind::Refresh, "r3").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_expired_tokens() {
    let repo = MockTokenRepository::new();
    let family = repo
        .create_family(TokenFamily::new(Uuid::new_v4()))
        .await
        .unwrap();

    let mut stale = record(TokenKind::ExchangeCode, family.id, "stale");
    stale.expires_at = Utc::now() - Duration::seconds(1);
    repo.save_token(stale).await.unwrap();
    repo.save_token(record(TokenKind::Refresh, family.id, "fresh"))
        .await
        .unwrap();

    let deleted = repo.delete_expired_tokens().await.unwrap();
    assert_eq!(deleted, 1);
    assert!(repo.find_token(TokenKind::Refresh, "fresh").await.unwrap().is_some());
}
