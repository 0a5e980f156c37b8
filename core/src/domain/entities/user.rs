//! User entity representing a registered principal.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::{Role, RoleSet};

/// Length in bytes of the generated OTP secret
const OTP_SECRET_BYTES: usize = 20;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique email address
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// Whether the user may log in at all
    pub login_permitted: bool,

    /// Whether the account is active
    pub is_active: bool,

    /// Whether the email address has been verified
    pub email_verified: bool,

    /// Hex-encoded secret for one-time passcodes. Generated exactly once at
    /// creation and never regenerated afterwards.
    pub otp_secret: String,

    /// Capability roles granted to this user
    pub roles: RoleSet,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a freshly generated OTP secret
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password_hash: password_hash.into(),
            login_permitted: true,
            is_active: true,
            email_verified: false,
            otp_secret: generate_otp_secret(),
            roles: RoleSet::from_roles(&[Role::Reader]),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this user may currently authenticate
    pub fn can_login(&self) -> bool {
        self.is_active && self.login_permitted
    }

    /// Replaces the password hash. The token-family cascade is the caller's
    /// responsibility; every stored session must be revoked alongside.
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.updated_at = Utc::now();
    }

    /// Marks the email address as verified
    pub fn verify_email(&mut self) {
        self.email_verified = true;
        self.updated_at = Utc::now();
    }

    /// Revokes login permission without deactivating the account
    pub fn forbid_login(&mut self) {
        self.login_permitted = false;
        self.updated_at = Utc::now();
    }

    /// Grants a role
    pub fn grant_role(&mut self, role: Role) {
        self.roles.insert(role);
        self.updated_at = Utc::now();
    }
}

fn generate_otp_secret() -> String {
    let mut bytes = [0u8; OTP_SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("a@x.com", "hash");
        assert_eq!(user.email, "a@x.com");
        assert!(user.login_permitted);
        assert!(user.is_active);
        assert!(!user.email_verified);
        assert!(user.can_login());
        assert!(user.roles.contains(Role::Reader));
    }

    #[test]
    fn test_otp_secret_generated_once() {
        let user = User::new("a@x.com", "hash");
        assert_eq!(user.otp_secret.len(), OTP_SECRET_BYTES * 2);
        // Two users never share a secret
        let other = User::new("b@x.com", "hash");
        assert_ne!(user.otp_secret, other.otp_secret);
    }

    #[test]
    fn test_forbidden_login() {
        let mut user = User::new("a@x.com", "hash");
        user.forbid_login();
        assert!(!user.can_login());
        assert!(user.is_active);
    }

    #[test]
    fn test_set_password_hash_touches_updated_at() {
        let mut user = User::new("a@x.com", "hash");
        let before = user.updated_at;
        user.set_password_hash("new-hash");
        assert_eq!(user.password_hash, "new-hash");
        assert!(user.updated_at >= before);
    }

    #[test]
    fn test_grant_role() {
        let mut user = User::new("a@x.com", "hash");
        user.grant_role(Role::Editor);
        assert!(user.roles.contains_all(&[Role::Reader, Role::Editor]));
    }
}
