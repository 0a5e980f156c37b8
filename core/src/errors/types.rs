//! Error type definitions for authentication and token management.
//!
//! These enums carry no internal detail; the presentation layer maps each
//! variant to a stable machine-readable code and an HTTP status. In
//! particular the login path collapses every failure cause into
//! `InvalidCredentials` so callers cannot enumerate accounts or clients.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown client, unknown email, wrong password, or login not
    /// permitted: all indistinguishable to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid client secret")]
    InvalidClientSecret,

    /// Logout was given a missing, malformed, or already-invalidated token
    #[error("Invalid tokens")]
    InvalidTokens,

    #[error("Invalid verification code")]
    InvalidVerificationCode,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Exchange code failed verification, expired, or was already redeemed
    #[error("Invalid or expired code")]
    InvalidOrExpiredCode,

    /// Generic refresh/access/reset token failure
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    /// An already-rotated refresh token was presented again: the whole
    /// family has been revoked and the caller must log in again.
    #[error("Token reuse detected")]
    TokenReuseDetected,

    /// Signature valid but past its expiry
    #[error("Token expired")]
    TokenExpired,

    /// Tampered, truncated, or otherwise undecodable token
    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid length: {field}")]
    InvalidLength { field: String },
}
