//! Tests for the token codec: signing, verification, and the
//! expired-vs-malformed distinction.

use uuid::Uuid;

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{KeyCategory, TokenCodec, TokenServiceConfig};

fn codec() -> TokenCodec {
    TokenCodec::new(&TokenServiceConfig::default())
}

fn refresh_claims(expiry_seconds: i64) -> Claims {
    let config = TokenServiceConfig::default();
    Claims::new_refresh_token(
        Uuid::new_v4(),
        Uuid::new_v4(),
        expiry_seconds,
        &config.issuer,
        &config.audience,
    )
}

#[test]
fn test_issue_and_verify_round_trip() {
    let codec = codec();
    let claims = refresh_claims(60);

    let token = codec.issue(&claims, KeyCategory::Refresh).unwrap();
    let verified = codec.verify(&token, KeyCategory::Refresh).unwrap();

    assert_eq!(verified, claims);
}

#[test]
fn test_cross_category_verification_fails() {
    let codec = codec();
    let claims = refresh_claims(60);
    let token = codec.issue(&claims, KeyCategory::Refresh).unwrap();

    // A refresh token must never verify under another category's key
    for category in [
        KeyCategory::ExchangeCode,
        KeyCategory::Access,
        KeyCategory::PasswordReset,
    ] {
        let err = codec.verify(&token, category).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Token(TokenError::InvalidTokenFormat)
        ));
    }
}

#[test]
fn test_tampered_token_is_malformed() {
    let codec = codec();
    let token = codec
        .issue(&refresh_claims(60), KeyCategory::Refresh)
        .unwrap();

    // Flip a character in the signature segment
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let err = codec.verify(&tampered, KeyCategory::Refresh).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidTokenFormat)
    ));
}

#[test]
fn test_garbage_token_is_malformed() {
    let codec = codec();
    let err = codec.verify("not-a-token", KeyCategory::Access).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidTokenFormat)
    ));
}

#[test]
fn test_expired_token_is_distinct_from_malformed() {
    let codec = codec();
    // Past the default 60s decoding leeway
    let token = codec
        .issue(&refresh_claims(-120), KeyCategory::Refresh)
        .unwrap();

    let err = codec.verify(&token, KeyCategory::Refresh).unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
}

#[test]
fn test_wrong_issuer_rejected() {
    let codec = codec();
    let claims = Claims::new_refresh_token(
        Uuid::new_v4(),
        Uuid::new_v4(),
        60,
        "someone-else",
        "quill-api",
    );
    let token = codec.issue(&claims, KeyCategory::Refresh).unwrap();

    // Same secret, different issuer claim
    let err = codec.verify(&token, KeyCategory::Refresh).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Token(TokenError::InvalidTokenFormat)
    ));
}
