//! Token codec: signing and verification with per-category keys.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::Claims;
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::TokenServiceConfig;

/// Purpose-specific signing key category.
///
/// Distinct keys per category mean a token issued for one purpose can never
/// verify as another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCategory {
    /// Single-use exchange codes
    ExchangeCode,
    /// Stateless access tokens
    Access,
    /// Rotating refresh tokens
    Refresh,
    /// Password-reset tokens
    PasswordReset,
}

struct CategoryKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl CategoryKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Encodes and verifies signed, time-bound tokens.
///
/// The signature is always checked before any claim is trusted; an expired
/// token with a valid signature is reported distinctly from a tampered one
/// so callers can clean up persisted records eagerly, but both are
/// unauthenticated.
pub struct TokenCodec {
    exchange_code: CategoryKeys,
    access: CategoryKeys,
    refresh: CategoryKeys,
    password_reset: CategoryKeys,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from the token configuration
    pub fn new(config: &TokenServiceConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;

        Self {
            exchange_code: CategoryKeys::from_secret(&config.exchange_code_secret),
            access: CategoryKeys::from_secret(&config.access_secret),
            refresh: CategoryKeys::from_secret(&config.refresh_secret),
            password_reset: CategoryKeys::from_secret(&config.password_reset_secret),
            validation,
        }
    }

    fn keys(&self, category: KeyCategory) -> &CategoryKeys {
        match category {
            KeyCategory::ExchangeCode => &self.exchange_code,
            KeyCategory::Access => &self.access,
            KeyCategory::Refresh => &self.refresh,
            KeyCategory::PasswordReset => &self.password_reset,
        }
    }

    /// Encodes and signs claims under the given category's key
    pub fn issue(&self, claims: &Claims, category: KeyCategory) -> DomainResult<String> {
        let header = Header::new(Algorithm::HS256);
        encode(&header, claims, &self.keys(category).encoding)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies signature and expiry, returning the claims
    ///
    /// # Errors
    /// * `TokenError::TokenExpired` - Valid signature, past expiry
    /// * `TokenError::InvalidTokenFormat` - Tampered, truncated, or signed
    ///   under a different category's key
    pub fn verify(&self, token: &str, category: KeyCategory) -> DomainResult<Claims> {
        decode::<Claims>(token, &self.keys(category).decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                if e.kind() == &jsonwebtoken::errors::ErrorKind::ExpiredSignature {
                    DomainError::Token(TokenError::TokenExpired)
                } else {
                    DomainError::Token(TokenError::InvalidTokenFormat)
                }
            })
    }
}
