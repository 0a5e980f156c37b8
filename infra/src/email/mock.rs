//! Mock email service for development and testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use quill_core::errors::DomainResult;
use quill_core::services::email::EmailService;

/// Email service that records messages instead of delivering them.
///
/// Used when no SMTP credentials are configured: the passcode is logged so
/// the forgot-password flow stays usable in development.
pub struct MockEmailService {
    sent: Arc<RwLock<Vec<(String, String)>>>,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Messages recorded so far as (recipient, otp) pairs
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
        info!(recipient, otp, "mock email service: password reset code");
        self.sent
            .write()
            .await
            .push((recipient.to_string(), otp.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_sends() {
        let service = MockEmailService::new();
        service
            .send_password_reset_email("a@x.com", "123456")
            .await
            .unwrap();

        let sent = service.sent().await;
        assert_eq!(sent, vec![("a@x.com".to_string(), "123456".to_string())]);
    }
}
