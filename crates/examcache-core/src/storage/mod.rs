//! Persistent key-value storage backends.
//!
//! The cache store talks to storage only through `KeyValueStorage`, so the
//! same logic runs against a directory on disk, an in-memory map in tests,
//! or no storage at all.
//!
//! - `FileStorage`: one JSON file per key under a directory
//! - `MemoryStorage`: process-local map with an optional byte quota

pub mod error;
pub mod file;
pub mod memory;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Synchronous string key-value storage.
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a key that does not exist is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
