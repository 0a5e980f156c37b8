//! Email delivery port consumed by the auth service.
//!
//! Delivery is an opaque capability of the infrastructure layer; the core
//! only cares that a message can be handed off. Sends happen off the
//! critical path and a failed delivery never fails the issuing request.

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Trait for sending authentication-related email
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send a password-reset passcode to a recipient
    async fn send_password_reset_email(&self, recipient: &str, otp: &str) -> DomainResult<()>;
}
