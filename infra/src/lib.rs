//! # Quill Infrastructure
//!
//! Infrastructure layer binding the core's repository and delivery ports to
//! real backends: MySQL (SQLx) for persistence and SMTP (lettre) for email.

pub mod database;
pub mod email;

pub use database::{
    create_pool, MySqlClientRepository, MySqlTokenRepository, MySqlUserRepository,
};
pub use email::{MockEmailService, SmtpEmailService};
