//! Domain entities representing core business objects.

pub mod client;
pub mod role;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use client::AuthorizationClient;
pub use role::{Role, RoleSet};
pub use token::{Claims, TokenFamily, TokenKind, TokenPair, TokenRecord};
pub use user::User;
