//! Authentication configuration: token signing keys, expiries, and the
//! authorization-client allow-list.

use serde::{Deserialize, Serialize};

const DEV_EXCHANGE_CODE_SECRET: &str = "dev-exchange-code-secret-change-in-production";
const DEV_ACCESS_SECRET: &str = "dev-access-token-secret-change-in-production";
const DEV_REFRESH_SECRET: &str = "dev-refresh-token-secret-change-in-production";
const DEV_PASSWORD_RESET_SECRET: &str = "dev-password-reset-secret-change-in-production";

/// Signing keys and expiry windows for every token category.
///
/// Each category carries its own secret so a leaked key compromises only one
/// kind of token. All expiries are in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
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

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            exchange_code_secret: String::from(DEV_EXCHANGE_CODE_SECRET),
            access_secret: String::from(DEV_ACCESS_SECRET),
            refresh_secret: String::from(DEV_REFRESH_SECRET),
            password_reset_secret: String::from(DEV_PASSWORD_RESET_SECRET),
            exchange_code_expiry: 120,      // 2 minutes
            access_token_expiry: 180,       // 3 minutes
            refresh_token_expiry: 36_000,   // 10 hours
            password_reset_expiry: 300,     // 5 minutes
            issuer: String::from("quill"),
            audience: String::from("quill-api"),
        }
    }
}

impl TokenConfig {
    /// Create from environment variables, falling back to development defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            exchange_code_secret: env_or("EXCHANGE_CODE_SECRET", defaults.exchange_code_secret),
            access_secret: env_or("ACCESS_TOKEN_SECRET", defaults.access_secret),
            refresh_secret: env_or("REFRESH_TOKEN_SECRET", defaults.refresh_secret),
            password_reset_secret: env_or(
                "PASSWORD_RESET_SECRET",
                defaults.password_reset_secret,
            ),
            exchange_code_expiry: env_parse("EXCHANGE_CODE_EXPIRY", defaults.exchange_code_expiry),
            access_token_expiry: env_parse("ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_parse("REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            password_reset_expiry: env_parse(
                "PASSWORD_RESET_EXPIRY",
                defaults.password_reset_expiry,
            ),
            issuer: defaults.issuer,
            audience: defaults.audience,
        }
    }

    /// Check whether any development secret is still in use (security warning)
    pub fn is_using_default_secrets(&self) -> bool {
        self.exchange_code_secret == DEV_EXCHANGE_CODE_SECRET
            || self.access_secret == DEV_ACCESS_SECRET
            || self.refresh_secret == DEV_REFRESH_SECRET
            || self.password_reset_secret == DEV_PASSWORD_RESET_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Token signing configuration
    pub tokens: TokenConfig,

    /// Allow-list of authorization client names provisioned at setup time
    #[serde(default = "default_clients")]
    pub clients: Vec<String>,

    /// One-time-passcode step in seconds
    #[serde(default = "default_otp_step")]
    pub otp_step: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            tokens: TokenConfig::default(),
            clients: default_clients(),
            otp_step: default_otp_step(),
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let clients = std::env::var("AUTH_CLIENTS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| default_clients());

        Self {
            tokens: TokenConfig::from_env(),
            clients,
            otp_step: env_parse("OTP_STEP", default_otp_step() as i64) as u64,
        }
    }
}

fn default_clients() -> Vec<String> {
    vec![String::from("Application")]
}

fn default_otp_step() -> u64 {
    1200 // 20 minutes
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_config_default() {
        let config = TokenConfig::default();
        assert_eq!(config.exchange_code_expiry, 120);
        assert_eq!(config.access_token_expiry, 180);
        assert_eq!(config.refresh_token_expiry, 36_000);
        assert_eq!(config.password_reset_expiry, 300);
        assert!(config.is_using_default_secrets());
    }

    #[test]
    fn test_distinct_secrets_per_category() {
        let config = TokenConfig::default();
        let secrets = [
            &config.exchange_code_secret,
            &config.access_secret,
            &config.refresh_secret,
            &config.password_reset_secret,
        ];
        for (i, a) in secrets.iter().enumerate() {
            for b in secrets.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_auth_config_default_clients() {
        let config = AuthConfig::default();
        assert_eq!(config.clients, vec!["Application"]);
        assert_eq!(config.otp_step, 1200);
    }
}
