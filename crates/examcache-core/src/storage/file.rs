use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use super::{KeyValueStorage, StorageError};

/// Directory-backed storage, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        debug!(?dir, "File storage ready");
        Ok(Self { dir })
    }

    fn item_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

/// Escape anything outside `[A-Za-z0-9_-]` so test ids cannot leave the
/// storage directory or collide after escaping.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{:02X}", byte);
        }
    }
    encoded
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.item_path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match std::fs::write(self.item_path(key), value) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::StorageFull => Err(StorageError::QuotaExceeded {
                key: key.to_string(),
                bytes: value.len(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.item_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("offline_exam_abc-123"), "offline_exam_abc-123");
        assert_eq!(encode_key("offline_exam_../x"), "offline_exam_%2E%2E%2Fx");
        assert_ne!(encode_key("a/b"), encode_key("a_b"));
    }

    #[test]
    fn test_round_trip_on_disk() {
        let temp = tempdir().expect("tempdir");
        let storage = FileStorage::new(temp.path().join("store")).unwrap();

        assert_eq!(storage.get_item("pending_results").unwrap(), None);
        storage.set_item("pending_results", "[]").unwrap();
        assert_eq!(storage.get_item("pending_results").unwrap().as_deref(), Some("[]"));
        assert!(temp.path().join("store").join("pending_results.json").exists());

        storage.remove_item("pending_results").unwrap();
        storage.remove_item("pending_results").unwrap();
        assert_eq!(storage.get_item("pending_results").unwrap(), None);
    }

    #[test]
    fn test_key_with_separator_stays_in_dir() {
        let temp = tempdir().expect("tempdir");
        let storage = FileStorage::new(temp.path()).unwrap();

        storage.set_item("offline_exam_a/b", "{}").unwrap();
        let entries: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(storage.get_item("offline_exam_a/b").unwrap().as_deref(), Some("{}"));
    }
}
