use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info};

use crate::models::{CachedTest, PendingResult, ProgressRecord};
use crate::storage::KeyValueStorage;

use super::CacheError;

const TEST_PREFIX: &str = "offline_exam_";
const PROGRESS_PREFIX: &str = "exam_progress_";
const PENDING_RESULTS_KEY: &str = "pending_results";

/// Namespaced cache of tests, progress and unsynced results.
///
/// Cheap to clone; clones share the same storage.
#[derive(Clone)]
pub struct OfflineStore {
    storage: Option<Arc<dyn KeyValueStorage>>,
}

impl fmt::Debug for OfflineStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfflineStore")
            .field("available", &self.is_available())
            .finish()
    }
}

impl OfflineStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// A store for contexts with no persistent storage.
    pub fn unavailable() -> Self {
        Self { storage: None }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn test_key(test_id: &str) -> String {
        format!("{}{}", TEST_PREFIX, test_id)
    }

    fn progress_key(test_id: &str) -> String {
        format!("{}{}", PROGRESS_PREFIX, test_id)
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let Some(storage) = &self.storage else {
            return Ok(None);
        };
        let Some(contents) = storage.get_item(key)? else {
            return Ok(None);
        };

        let value = serde_json::from_str(&contents).map_err(|source| CacheError::Serde {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(value))
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };

        let contents = serde_json::to_string(value).map_err(|source| CacheError::Serde {
            key: key.to_string(),
            source,
        })?;
        storage.set_item(key, &contents)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        if let Some(storage) = &self.storage {
            storage.remove_item(key)?;
        }
        Ok(())
    }

    // ===== Tests =====

    /// Cache a full test for offline use. Nothing is evicted to make room.
    pub fn save_test(&self, test: &CachedTest) -> Result<(), CacheError> {
        match self.save(&Self::test_key(&test.id), test) {
            Ok(()) => {
                if self.is_available() {
                    info!(test_id = %test.id, "Test cached offline");
                }
                Ok(())
            }
            Err(e) => {
                error!(test_id = %test.id, error = %e, "Failed to save test offline");
                Err(e)
            }
        }
    }

    pub fn get_test(&self, test_id: &str) -> Result<Option<CachedTest>, CacheError> {
        self.load(&Self::test_key(test_id))
    }

    // ===== Progress =====

    /// Replace the saved answer map for a test.
    pub fn save_progress(&self, test_id: &str, answers: &ProgressRecord) -> Result<(), CacheError> {
        self.save(&Self::progress_key(test_id), answers)
    }

    pub fn get_progress(&self, test_id: &str) -> Result<Option<ProgressRecord>, CacheError> {
        self.load(&Self::progress_key(test_id))
    }

    /// Remove a test and its progress. Missing entries are fine.
    pub fn clear_test(&self, test_id: &str) -> Result<(), CacheError> {
        self.remove(&Self::test_key(test_id))?;
        self.remove(&Self::progress_key(test_id))?;
        debug!(test_id, "Cleared cached test and progress");
        Ok(())
    }

    // ===== Pending Results =====

    /// Append a result to the pending queue.
    ///
    /// Reads and rewrites the whole queue, so concurrent writers from other
    /// processes can lose entries.
    pub fn save_pending_result(&self, result: &PendingResult) -> Result<(), CacheError> {
        if !self.is_available() {
            return Ok(());
        }

        let mut pending = self.get_pending_results()?;
        pending.push(result.clone());
        self.save(PENDING_RESULTS_KEY, &pending)?;
        info!(
            test_id = %result.test_id,
            submitted_at = %result.submitted_at,
            queued = pending.len(),
            "Result queued for sync"
        );
        Ok(())
    }

    /// All queued results in insertion order.
    pub fn get_pending_results(&self) -> Result<Vec<PendingResult>, CacheError> {
        Ok(self.load(PENDING_RESULTS_KEY)?.unwrap_or_default())
    }

    /// Drop queued results whose submission timestamp is in `submitted_at`.
    /// Returns how many entries were removed.
    pub fn remove_pending_results(&self, submitted_at: &[DateTime<Utc>]) -> Result<usize, CacheError> {
        if !self.is_available() {
            return Ok(0);
        }

        let targets: HashSet<&DateTime<Utc>> = submitted_at.iter().collect();
        let mut pending = self.get_pending_results()?;
        let before = pending.len();
        pending.retain(|r| !targets.contains(&r.submitted_at));

        self.save(PENDING_RESULTS_KEY, &pending)?;
        let removed = before - pending.len();
        debug!(removed, remaining = pending.len(), "Removed synced pending results");
        Ok(removed)
    }
}

// ============================================================================
// Tests
// ============================================================================
