//! Shared utilities and common types for the Quill server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - API response structures
//! - Utility functions (email validation, etc.)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, EmailConfig, Environment, LoggingConfig,
    ServerConfig, TokenConfig,
};
pub use types::{ApiResponse, ErrorResponse};
pub use utils::validation;
