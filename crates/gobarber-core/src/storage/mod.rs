//! Persistent key-value storage for the session store.
//!
//! This module provides:
//! - `Storage`: string-keyed get/set/remove interface
//! - `MemoryStorage`: in-process map, for tests and ephemeral runs
//! - `FileStorage`: JSON file on disk, survives restarts
//! - `KeyringStorage`: OS keychain via keyring
//!
//! Values are stored verbatim; callers own the encoding.

pub mod file;
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use self::file::FileStorage;
pub use self::keychain::KeyringStorage;
pub use self::memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a key that does not exist is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
