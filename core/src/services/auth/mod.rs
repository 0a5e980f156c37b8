//! Authentication service module
//!
//! Orchestrates the login/exchange protocol on top of the token services:
//! credential verification, exchange-code issuance and redemption, logout,
//! and the password lifecycle (change, forgot, OTP verification, reset).

mod config;
mod otp;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use otp::{generate_otp, verify_otp};
pub use password::{hash_password, verify_password};
pub use service::AuthService;
