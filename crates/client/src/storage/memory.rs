//! Process-local storage backend.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{StorageBackend, StorageError};

/// Non-durable in-memory backend.
///
/// Stands in for the sandboxed runtime's storage in headless builds and
/// tests. Contents vanish when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let backend = MemoryBackend::new();
        backend.set_item("k", "v").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), Some("v".to_string()));

        backend.remove_item("k").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let backend = MemoryBackend::new();
        backend.remove_item("never-set").unwrap();
    }

    #[test]
    fn test_clear() {
        let backend = MemoryBackend::new();
        backend.set_item("a", "1").unwrap();
        backend.set_item("b", "2").unwrap();
        backend.clear().unwrap();
        assert_eq!(backend.get_item("a").unwrap(), None);
        assert_eq!(backend.get_item("b").unwrap(), None);
    }
}
