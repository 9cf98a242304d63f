//! User persistence
//!
//! The [`UserStore`] port is the only way the application reaches durable
//! storage. Adapters live in the submodules.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use companionfit_core::User;
use thiserror::Error;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors from a persistence adapter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Failed to serialize user: {0}")]
    Serialization(String),

    #[error("Stored user data is corrupt: {0}")]
    Corrupt(String),
}

/// Persistence gateway for the single local user
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load the persisted user, `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<User>, StoreError>;

    /// Persist the whole aggregate, replacing what was stored
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Remove any persisted user
    async fn clear(&self) -> Result<(), StoreError>;
}
