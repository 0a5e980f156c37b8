//! Periodic cleanup of expired token records.
//!
//! Advisory maintenance: verification paths already delete expired records
//! opportunistically, so this loop only bounds how long stale rows and
//! spent tombstones linger. It runs uncoordinated and tolerates failure.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::errors::DomainResult;
use crate::repositories::TokenRepository;

use super::service::TokenService;

/// Configuration for the token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

/// Summary of one cleanup cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired records deleted
    pub expired_tokens_deleted: usize,
}

/// Service running periodic cleanup against a token service
pub struct TokenCleanupService<R: TokenRepository + 'static> {
    token_service: Arc<TokenService<R>>,
    config: TokenCleanupConfig,
}

impl<R: TokenRepository> TokenCleanupService<R> {
    /// Create a new token cleanup service
    pub fn new(token_service: Arc<TokenService<R>>, config: TokenCleanupConfig) -> Self {
        Self {
            token_service,
            config,
        }
    }

    /// Run a single cleanup cycle
    pub async fn run_cleanup(&self) -> DomainResult<CleanupResult> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let deleted = self.token_service.cleanup_expired_tokens().await?;
        if deleted > 0 {
            info!(deleted, "token cleanup cycle removed expired records");
        }

        Ok(CleanupResult {
            expired_tokens_deleted: deleted,
        })
    }

    /// Spawn the periodic cleanup loop onto the runtime
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        let interval = Duration::from_secs(self.config.interval_seconds.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup stays quiet
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_cleanup().await {
                    error!(error = %e, "token cleanup cycle failed");
                }
            }
        })
    }
}
