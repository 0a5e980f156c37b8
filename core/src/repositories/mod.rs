//! Repository traits abstracting the durable store, with in-memory mock
//! implementations used by the service tests.

pub mod client;
pub mod token;
pub mod user;

pub use client::{ClientRepository, MockClientRepository};
pub use token::{MockTokenRepository, TokenRepository};
pub use user::{MockUserRepository, UserRepository};
