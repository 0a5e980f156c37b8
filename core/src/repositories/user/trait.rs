//! User repository trait defining the interface for user persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainResult;

/// Repository trait for User entity persistence operations
///
/// Implementations must enforce email uniqueness; a duplicate insert is
/// reported as a domain error, never a panic or raw database error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The saved user
    /// * `Err(DomainError)` - Save failed (e.g. duplicate email)
    async fn create(&self, user: User) -> DomainResult<User>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    /// Check whether a user with the given email exists
    async fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Replace a user's password hash
    ///
    /// # Returns
    /// * `Ok(true)` - Password updated
    /// * `Ok(false)` - No user with that ID
    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> DomainResult<bool>;
}
