//! Scoped key-value persistence.
//!
//! The session layer persists itself through this seam so the host shell
//! can plug in whatever the platform offers. Two implementations ship with
//! the crate: [`FileStorage`] (a JSON object file in the platform data
//! dir) and [`MemoryStorage`] (ephemeral, for tests).

pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage key holding the bearer token.
pub const KEY_TOKEN: &str = "token";

/// Storage key holding the JSON-serialized user record.
pub const KEY_USER: &str = "user";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Async key-value capability with string values.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read a value, `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace a value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
