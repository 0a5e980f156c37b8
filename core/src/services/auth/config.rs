//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Allow-list of client names provisioned at setup time
    pub clients: Vec<String>,
    /// One-time-passcode step in seconds
    pub otp_step: u64,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            clients: vec!["Application".to_string()],
            otp_step: 1200,
        }
    }
}

impl From<&quill_shared::config::AuthConfig> for AuthServiceConfig {
    fn from(config: &quill_shared::config::AuthConfig) -> Self {
        Self {
            clients: config.clients.clone(),
            otp_step: config.otp_step,
        }
    }
}
