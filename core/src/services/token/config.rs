//! Configuration for the token services

/// Configuration for token signing and expiry windows.
///
/// Every category has its own signing secret; all expiries are in seconds.
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Signing secret for exchange codes
    pub exchange_code_secret: String,
    /// Signing secret for access tokens
    pub access_secret: String,
    /// Signing secret for refresh tokens
    pub refresh_secret: String,
    /// Signing secret for password-reset tokens
    pub password_reset_secret: String,
    /// Exchange code expiry in seconds
    pub exchange_code_expiry: i64,
    /// Access token expiry in seconds
    pub access_token_expiry: i64,
    /// Refresh token expiry in seconds
    pub refresh_token_expiry: i64,
    /// Password-reset token expiry in seconds
    pub password_reset_expiry: i64,
    /// JWT issuer claim
    pub issuer: String,
    /// JWT audience claim
    pub audience: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            exchange_code_secret: "dev-exchange-code-secret-change-in-production".to_string(),
            access_secret: "dev-access-token-secret-change-in-production".to_string(),
            refresh_secret: "dev-refresh-token-secret-change-in-production".to_string(),
            password_reset_secret: "dev-password-reset-secret-change-in-production".to_string(),
            exchange_code_expiry: 120,
            access_token_expiry: 180,
            refresh_token_expiry: 36_000,
            password_reset_expiry: 300,
            issuer: "quill".to_string(),
            audience: "quill-api".to_string(),
        }
    }
}

impl From<&quill_shared::config::TokenConfig> for TokenServiceConfig {
    fn from(config: &quill_shared::config::TokenConfig) -> Self {
        Self {
            exchange_code_secret: config.exchange_code_secret.clone(),
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            password_reset_secret: config.password_reset_secret.clone(),
            exchange_code_expiry: config.exchange_code_expiry,
            access_token_expiry: config.access_token_expiry,
            refresh_token_expiry: config.refresh_token_expiry,
            password_reset_expiry: config.password_reset_expiry,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }
}
