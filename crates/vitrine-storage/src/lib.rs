//! Persistent storage abstraction for the Vitrine client core.
//!
//! This crate provides the key-value layer the session and favorites
//! subsystems sit on:
//! - **`JsonFileStore`**: the default backend, a single JSON object file
//!   under the app data directory
//! - **`MemoryStore`**: an ephemeral backend for tests and previews
//! - **`SessionVault`**: typed accessors over the raw store for the
//!   credential, cached user info, and cached login email

mod file_store;
mod keys;
mod memory;
mod traits;
mod vault;

pub use file_store::JsonFileStore;
pub use keys::StorageKeys;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
pub use vault::{SessionVault, UserInfo};

use std::sync::Arc;

use thiserror::Error;
use vitrine_core::Paths;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed store rooted at the app data directory.
pub fn create_store(paths: &Paths) -> JsonFileStore {
    JsonFileStore::new(paths.session_file())
}

/// Create a session vault over the default file-backed store.
pub fn create_session_vault(paths: &Paths) -> SessionVault {
    SessionVault::new(Arc::new(create_store(paths)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_lives_under_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        let store = create_store(&paths);
        assert!(store.path().starts_with(dir.path()));
    }
}
