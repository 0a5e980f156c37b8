//! Password hashing capability (bcrypt).

use crate::errors::{DomainError, DomainResult};

/// Hash a plaintext password with bcrypt at the default cost
pub fn hash_password(plain: &str) -> DomainResult<String> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST).map_err(|e| DomainError::Internal {
        message: format!("Failed to hash password: {}", e),
    })
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Any decoding failure counts as a mismatch; verification never errors out
/// toward the caller.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        // Low cost keeps the test fast; verify reads the cost from the hash
        let hash = bcrypt::hash("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_verify_garbage_hash_is_false() {
        assert!(!verify_password("hunter2", "not-a-bcrypt-hash"));
        assert!(!verify_password("hunter2", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = bcrypt::hash("same-password", 4).unwrap();
        let b = bcrypt::hash("same-password", 4).unwrap();
        assert_ne!(a, b);
    }
}
