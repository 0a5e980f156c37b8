//! Authorization client repository interface and mock implementation.

mod mock;
mod r#trait;

pub use mock::MockClientRepository;
pub use r#trait::ClientRepository;
