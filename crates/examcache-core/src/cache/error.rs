use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to encode or decode cache entry {key}: {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, CacheError::Storage(e) if e.is_quota_exceeded())
    }
}
