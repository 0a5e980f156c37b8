//! Cross-trait mocks for auth service tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::{DomainError, DomainResult};
use crate::services::email::EmailService;

/// Mock email service capturing every send
pub struct MockEmailService {
    sent: Arc<RwLock<Vec<(String, String)>>>,
    fail: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            fail: false,
        }
    }

    /// A service whose every send fails
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
            fail: true,
        }
    }

    /// Messages sent so far as (recipient, otp) pairs
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.read().await.clone()
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_password_reset_email(&self, recipient: &str, otp: &str) -> DomainResult<()> {
        if self.fail {
            return Err(DomainError::Internal {
                message: "smtp unavailable".to_string(),
            });
        }
        self.sent
            .write()
            .await
            .push((recipient.to_string(), otp.to_string()));
        Ok(())
    }
}
