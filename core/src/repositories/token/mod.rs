//! Token repository interface and mock implementation.

mod mock;
mod r#trait;

#[cfg(test)]
mod tests;

pub use mock::MockTokenRepository;
pub use r#trait::TokenRepository;
