//! SMTP email delivery via lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use quill_core::errors::{DomainError, DomainResult};
use quill_core::services::email::EmailService;
use quill_shared::config::EmailConfig;

/// SMTP implementation of the email delivery port
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailService {
    /// Create a new SMTP email service from configuration
    pub fn new(config: &EmailConfig) -> Result<Self, DomainError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to build SMTP transport: {}", e),
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = config
            .from_address
            .parse()
            .map_err(|e| DomainError::Internal {
                message: format!("Invalid from address: {}", e),
            })?;

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl EmailService for SmtpEmailService {
    async fn send_password_reset_email(&self, recipient: &str, otp: &str) -> DomainResult<()> {
        let to: Mailbox = recipient.parse().map_err(|e| DomainError::Internal {
            message: format!("Invalid recipient address: {}", e),
        })?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Your Quill password reset code")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Your password reset code is: {}\n\n\
                 The code is valid for a limited time. If you did not request \
                 a password reset, you can safely ignore this message.\n",
                otp
            ))
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to build email: {}", e),
            })?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("SMTP send failed: {}", e),
            })?;

        debug!(recipient, "password reset email sent");
        Ok(())
    }
}
