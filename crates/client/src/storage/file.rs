//! Durable single-file storage backend.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{StorageBackend, StorageError};

/// File-backed storage: the whole key space is one flat string map,
/// persisted as a JSON object.
///
/// Every mutation rewrites the file before returning, so a crash loses at
/// most the mutation in flight. There is no file locking - the client is a
/// single process and storage is single-writer by design.
pub struct FileBackend {
    path: PathBuf,
    items: Mutex<HashMap<String, String>>,
}

impl FileBackend {
    /// Open the backend at `path`, loading any existing snapshot.
    ///
    /// An unreadable or corrupt snapshot starts the backend empty (and is
    /// logged); storage is a cache layer, not a source of truth.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match Self::load(&path) {
            Ok(items) => items,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "storage snapshot unreadable, starting empty");
                HashMap::new()
            }
        };

        Self {
            path,
            items: Mutex::new(items),
        }
    }

    fn load(path: &Path) -> Result<HashMap<String, String>, StorageError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn flush(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_owned(), value.to_owned());
        self.flush(&items)
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        self.flush(&items)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.clear();
        self.flush(&items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("order-ease-storage-test-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn test_survives_reopen() {
        let path = temp_path();

        {
            let backend = FileBackend::new(&path);
            backend.set_item("token", "tok-1").unwrap();
            backend.set_item("shop_id", "s-1").unwrap();
        }

        let reopened = FileBackend::new(&path);
        assert_eq!(
            reopened.get_item("token").unwrap(),
            Some("tok-1".to_string())
        );
        assert_eq!(
            reopened.get_item("shop_id").unwrap(),
            Some("s-1".to_string())
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let path = temp_path();
        fs::write(&path, "{{{ not json").unwrap();

        let backend = FileBackend::new(&path);
        assert_eq!(backend.get_item("anything").unwrap(), None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_remove_persists() {
        let path = temp_path();

        {
            let backend = FileBackend::new(&path);
            backend.set_item("a", "1").unwrap();
            backend.remove_item("a").unwrap();
        }

        let reopened = FileBackend::new(&path);
        assert_eq!(reopened.get_item("a").unwrap(), None);

        let _ = fs::remove_file(&path);
    }
}
