//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Login (credentials -> exchange code)
//! - Code redemption (exchange code -> token pair)
//! - Token refresh (rotation with reuse detection)
//! - Logout
//! - Registration and the password lifecycle

pub mod clients;
pub mod login;
pub mod logout;
pub mod password;
pub mod refresh;
pub mod register;
pub mod token;

use std::sync::Arc;

use quill_core::repositories::{ClientRepository, TokenRepository, UserRepository};
use quill_core::services::auth::AuthService;
use quill_core::services::email::EmailService;

/// Application state that holds shared services
pub struct AppState<U, C, R, E>
where
    U: UserRepository,
    C: ClientRepository,
    R: TokenRepository,
    E: EmailService + 'static,
{
    pub auth_service: Arc<AuthService<U, C, R, E>>,
}
