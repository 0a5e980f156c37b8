//! MySQL implementations of the core repository traits.

mod client_repository_impl;
mod token_repository_impl;
mod user_repository_impl;

pub use client_repository_impl::MySqlClientRepository;
pub use token_repository_impl::MySqlTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

use quill_core::errors::DomainError;

/// Convert a SQLx error into a domain error, folding constraint violations
/// into validation failures instead of leaking raw database detail.
pub(crate) fn map_sqlx_error(context: &str, error: sqlx::Error) -> DomainError {
    if let Some(db_error) = error.as_database_error() {
        match db_error.kind() {
            sqlx::error::ErrorKind::UniqueViolation => {
                return DomainError::Validation {
                    message: format!("{}: already exists", context),
                };
            }
            sqlx::error::ErrorKind::ForeignKeyViolation => {
                return DomainError::NotFound {
                    resource: context.to_string(),
                };
            }
            _ => {}
        }
    }
    DomainError::Database {
        message: format!("{}: {}", context, error),
    }
}
