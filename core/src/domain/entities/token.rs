//! Token entities: signed claims, token families, and persisted records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

/// Claims structure shared by every token category.
///
/// Expiry windows come from configuration, not constants; the `jti` keeps
/// two tokens issued for identical claims within the same second distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Token family this token descends from (absent on password-reset tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fam: Option<String>,

    /// Public client identifier (exchange codes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,

    /// Roles held by the subject (access tokens only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl Claims {
    fn base(user_id: Uuid, expiry_seconds: i64, issuer: &str, audience: &str) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::seconds(expiry_seconds);
        Self {
            sub: user_id.to_string(),
            fam: None,
            cid: None,
            roles: Vec::new(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Creates claims for an exchange code, bound to a family and a client
    pub fn new_exchange_code(
        user_id: Uuid,
        family_id: Uuid,
        client_id: &str,
        expiry_seconds: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let mut claims = Self::base(user_id, expiry_seconds, issuer, audience);
        claims.fam = Some(family_id.to_string());
        claims.cid = Some(client_id.to_string());
        claims
    }

    /// Creates claims for a stateless access token carrying the role set
    pub fn new_access_token(
        user_id: Uuid,
        family_id: Uuid,
        roles: Vec<Role>,
        expiry_seconds: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let mut claims = Self::base(user_id, expiry_seconds, issuer, audience);
        claims.fam = Some(family_id.to_string());
        claims.roles = roles;
        claims
    }

    /// Creates claims for a refresh token
    pub fn new_refresh_token(
        user_id: Uuid,
        family_id: Uuid,
        expiry_seconds: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let mut claims = Self::base(user_id, expiry_seconds, issuer, audience);
        claims.fam = Some(family_id.to_string());
        claims
    }

    /// Creates claims for a password-reset token (no family)
    pub fn new_password_reset(
        user_id: Uuid,
        expiry_seconds: i64,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self::base(user_id, expiry_seconds, issuer, audience)
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Gets the token family ID from the claims, if present and well-formed
    pub fn family_id(&self) -> Option<Uuid> {
        self.fam.as_deref().and_then(|f| Uuid::parse_str(f).ok())
    }

    /// Absolute expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// One continuous authenticated session lineage, created at login.
///
/// Owns every exchange code and refresh token descending from that login;
/// deleting the family revokes them all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFamily {
    /// Unique identifier for the family
    pub id: Uuid,

    /// User this lineage belongs to
    pub user_id: Uuid,

    /// Timestamp when the family was created
    pub created_at: DateTime<Utc>,
}

impl TokenFamily {
    /// Creates a new token family for a user
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Kind of persisted token record. Access tokens are stateless and never
/// persisted, so they have no kind here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Single-use exchange code
    #[serde(rename = "code")]
    ExchangeCode,
    /// Rotating refresh token
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::ExchangeCode => "code",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::str::FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(TokenKind::ExchangeCode),
            "refresh" => Ok(TokenKind::Refresh),
            other => Err(format!("Unknown token kind: {}", other)),
        }
    }
}

/// Persisted token record.
///
/// Stores the SHA-256 hash of the token string, never the string itself.
/// Invariant: at most one `Refresh` record per family has `is_valid = true`;
/// a rotated record stays behind with `is_valid = false` as the tombstone
/// that makes reuse detectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Record kind (exchange code or refresh token)
    pub kind: TokenKind,

    /// Owning token family
    pub family_id: Uuid,

    /// SHA-256 hex digest of the token string
    pub token_hash: String,

    /// False once rotated (refresh): the tombstone state
    pub is_valid: bool,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Signed expiry of the underlying token, kept for cleanup
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Creates a new valid token record
    pub fn new(
        kind: TokenKind,
        family_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            family_id,
            token_hash,
            is_valid: true,
            created_at: Utc::now(),
            expires_at,
        }
    }

    /// Checks if the record's underlying token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Marks the record as rotated (tombstone)
    pub fn invalidate(&mut self) {
        self.is_valid = false;
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// Refresh token expiry time in seconds
    pub refresh_expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_in: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_in,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS: &str = "quill";
    const AUD: &str = "quill-api";

    #[test]
    fn test_exchange_code_claims() {
        let user_id = Uuid::new_v4();
        let family_id = Uuid::new_v4();
        let claims = Claims::new_exchange_code(user_id, family_id, "client-1", 120, ISS, AUD);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.family_id(), Some(family_id));
        assert_eq!(claims.cid.as_deref(), Some("client-1"));
        assert!(claims.roles.is_empty());
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 120);
    }

    #[test]
    fn test_access_token_claims_carry_roles() {
        let user_id = Uuid::new_v4();
        let family_id = Uuid::new_v4();
        let claims = Claims::new_access_token(
            user_id,
            family_id,
            vec![Role::Reader, Role::Editor],
            180,
            ISS,
            AUD,
        );

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.roles, vec![Role::Reader, Role::Editor]);
        assert!(claims.cid.is_none());
    }

    #[test]
    fn test_password_reset_claims_have_no_family() {
        let claims = Claims::new_password_reset(Uuid::new_v4(), 300, ISS, AUD);
        assert!(claims.fam.is_none());
        assert_eq!(claims.family_id(), None);
    }

    #[test]
    fn test_claims_expiration() {
        let mut claims = Claims::new_refresh_token(Uuid::new_v4(), Uuid::new_v4(), 60, ISS, AUD);
        assert!(!claims.is_expired());

        claims.exp = Utc::now().timestamp() - 1;
        assert!(claims.is_expired());
    }

    #[test]
    fn test_jti_unique_for_identical_claims() {
        let user_id = Uuid::new_v4();
        let family_id = Uuid::new_v4();
        let a = Claims::new_refresh_token(user_id, family_id, 60, ISS, AUD);
        let b = Claims::new_refresh_token(user_id, family_id, 60, ISS, AUD);
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_token_record_lifecycle() {
        let family = TokenFamily::new(Uuid::new_v4());
        let mut record = TokenRecord::new(
            TokenKind::Refresh,
            family.id,
            "hash".to_string(),
            Utc::now() + Duration::seconds(60),
        );

        assert!(record.is_valid);
        assert!(!record.is_expired());

        record.invalidate();
        assert!(!record.is_valid);
    }

    #[test]
    fn test_token_record_expiry() {
        let record = TokenRecord::new(
            TokenKind::ExchangeCode,
            Uuid::new_v4(),
            "hash".to_string(),
            Utc::now() - Duration::seconds(1),
        );
        assert!(record.is_expired());
    }

    #[test]
    fn test_token_kind_round_trip() {
        assert_eq!("code".parse::<TokenKind>().unwrap(), TokenKind::ExchangeCode);
        assert_eq!("refresh".parse::<TokenKind>().unwrap(), TokenKind::Refresh);
        assert!("access".parse::<TokenKind>().is_err());
    }

    #[test]
    fn test_claims_serialization() {
        let claims = Claims::new_access_token(
            Uuid::new_v4(),
            Uuid::new_v4(),
            vec![Role::Admin],
            180,
            ISS,
            AUD,
        );
        let json = serde_json::to_string(&claims).unwrap();
        let decoded: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, decoded);
    }

    #[test]
    fn test_token_pair_creation() {
        let pair = TokenPair::new("access".to_string(), "refresh".to_string(), 180, 36_000);
        assert_eq!(pair.access_expires_in, 180);
        assert_eq!(pair.refresh_expires_in, 36_000);
    }
}
