//! Authorization client entity: a registered caller identity.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const CLIENT_ID_BYTES: usize = 32;
const CLIENT_SECRET_BYTES: usize = 64;

/// A registered application allowed to drive the login protocol.
///
/// Provisioned once from the configured allow-list; immutable afterwards and
/// never deleted in normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationClient {
    /// Unique identifier
    pub id: Uuid,

    /// Unique human-readable name (from the allow-list)
    pub name: String,

    /// Public client identifier presented at login
    pub client_id: String,

    /// High-entropy secret presented at code redemption
    pub client_secret: String,

    /// Timestamp when the client was provisioned
    pub created_at: DateTime<Utc>,
}

impl AuthorizationClient {
    /// Provisions a new client with freshly generated credentials
    pub fn provision(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            client_id: random_hex(CLIENT_ID_BYTES),
            client_secret: random_hex(CLIENT_SECRET_BYTES),
            created_at: Utc::now(),
        }
    }

    /// Compares a candidate secret in constant time
    pub fn secret_matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.client_secret.as_bytes(), candidate.as_bytes())
    }
}

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_generates_credentials() {
        let client = AuthorizationClient::provision("Application");
        assert_eq!(client.name, "Application");
        assert_eq!(client.client_id.len(), CLIENT_ID_BYTES * 2);
        assert_eq!(client.client_secret.len(), CLIENT_SECRET_BYTES * 2);
    }

    #[test]
    fn test_credentials_are_unique() {
        let a = AuthorizationClient::provision("A");
        let b = AuthorizationClient::provision("B");
        assert_ne!(a.client_id, b.client_id);
        assert_ne!(a.client_secret, b.client_secret);
    }

    #[test]
    fn test_secret_matches() {
        let client = AuthorizationClient::provision("Application");
        let secret = client.client_secret.clone();
        assert!(client.secret_matches(&secret));
        assert!(!client.secret_matches("wrong"));
        assert!(!client.secret_matches(""));
    }
}
