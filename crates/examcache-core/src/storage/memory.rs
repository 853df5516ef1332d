use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{KeyValueStorage, StorageError};

/// In-memory storage. With a quota, writes that would push the total size of
/// keys and values past it are rejected, like a full browser store.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic mid-insert leaves the map consistent, so poisoning is ignored
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items();

        if let Some(quota) = self.quota_bytes {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let bytes = key.len() + value.len();
            if used + bytes > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    bytes,
                });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("a").unwrap(), None);

        storage.set_item("a", "1").unwrap();
        storage.set_item("a", "2").unwrap();
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("a").unwrap();
        storage.remove_item("a").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345").unwrap();

        let err = storage.set_item("k2", "123456789").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(storage.get_item("k2").unwrap(), None);
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "123456789").unwrap();
        // Overwriting the same key frees the old value first
        storage.set_item("k", "987654321").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("987654321"));
    }
}
