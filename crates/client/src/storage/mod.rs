//! Persistent key-value storage abstraction.
//!
//! The client ships against two incompatible host persistence backends.
//! Which one is in use is resolved once at startup via [`Storage::from_config`]
//! and never changes at runtime; everything above this module talks to the
//! [`Storage`] facade.
//!
//! # Fail-open policy
//!
//! This is a non-critical cache layer. Backend failures (quota exceeded,
//! I/O error, poisoned lock) are caught and logged, never propagated:
//! callers cannot distinguish "absent" from "failed read". That is a
//! documented contract, not an oversight - session and cart code relies on
//! absence being the worst case.

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{ClientConfig, StorageKind};

/// Stable storage key contract.
///
/// Every historical client build reads and writes these exact keys; renaming
/// one silently logs users out or empties carts on upgrade.
pub mod keys {
    /// Venue-scoped shop identifier.
    pub const SHOP_ID: &str = "shop_id";

    /// Authenticated user identifier.
    pub const USER_ID: &str = "user_id";

    /// Bearer token for authenticated requests. Stored as a raw string, not
    /// JSON - the host platform writes it directly in some login flows.
    pub const TOKEN: &str = "token";

    /// Serialized user profile blob.
    pub const USER_INFO: &str = "user_info";

    /// Serialized cart snapshot.
    pub const CART_DATA: &str = "cart_data";
}

/// Error raised by a storage backend. Never escapes the [`Storage`] facade.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Host persistence primitive.
///
/// Implementations store raw strings under string keys. All operations are
/// synchronous; errors are returned so the facade can apply the fail-open
/// policy in one place.
pub trait StorageBackend: Send + Sync {
    /// Store a raw string value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Fetch a raw string value.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Uniform get/set/remove/clear over the selected host backend, with JSON
/// round-tripping.
///
/// Cheaply cloneable; clones share the same backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
}

impl Storage {
    /// Wrap an explicit backend (dependency injection; tests use this with
    /// doubles).
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Resolve the backend from configuration, once per process.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        match &config.storage {
            StorageKind::Memory => Self::new(Arc::new(MemoryBackend::new())),
            StorageKind::File { path } => Self::new(Arc::new(FileBackend::new(path.clone()))),
        }
    }

    /// Store a value under `key`.
    ///
    /// Non-string values are serialized to a JSON string before delegating;
    /// string values are stored raw so they round-trip byte-for-byte with
    /// strings the host platform wrote itself.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_value(value) {
            Ok(serde_json::Value::String(s)) => s,
            Ok(json) => json.to_string(),
            Err(error) => {
                tracing::warn!(key, %error, "failed to serialize value for storage");
                return;
            }
        };

        if let Err(error) = self.backend.set_item(key, &raw) {
            tracing::warn!(key, %error, "storage write failed");
        }
    }

    /// Fetch the value under `key` with the tolerant-read rule: the stored
    /// string is JSON-decoded, and on decode failure the raw string itself
    /// is returned. Storage may hold plain strings written by the host
    /// platform (e.g. a raw token).
    #[must_use]
    pub fn get_value(&self, key: &str) -> Option<serde_json::Value> {
        let raw = match self.backend.get_item(key) {
            Ok(value) => value?,
            Err(error) => {
                tracing::warn!(key, %error, "storage read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(json) => Some(json),
            Err(_) => Some(serde_json::Value::String(raw)),
        }
    }

    /// Typed fetch via the tolerant-read rule. Returns `None` when the key
    /// is absent, the backend failed, or the stored value does not match
    /// `T`.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(error) => {
                tracing::warn!(key, %error, "stored value does not match expected shape");
                None
            }
        }
    }

    /// Fetch a value as a plain string, regardless of how it was stored.
    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get_value(key)? {
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Remove the value under `key`.
    pub fn remove(&self, key: &str) {
        if let Err(error) = self.backend.remove_item(key) {
            tracing::warn!(key, %error, "storage remove failed");
        }
    }

    /// Remove every stored value.
    pub fn clear(&self) {
        if let Err(error) = self.backend.clear() {
            tracing::warn!(%error, "storage clear failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use serde::{Deserialize, Serialize};

    /// Backend double that fails every operation, for asserting the
    /// fail-open contract.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }

        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Poisoned)
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }

        fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Poisoned)
        }
    }

    fn memory_storage() -> Storage {
        Storage::new(Arc::new(MemoryBackend::new()))
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        a: i32,
    }

    #[test]
    fn test_structure_round_trip() {
        let storage = memory_storage();
        storage.set("k", &Blob { a: 1 });

        let back: Blob = storage.get("k").unwrap();
        assert_eq!(back, Blob { a: 1 });
    }

    #[test]
    fn test_string_stored_raw() {
        let storage = memory_storage();
        storage.set(keys::TOKEN, "tok-abc123");

        // Raw string, no JSON quoting
        assert_eq!(
            storage.get_string(keys::TOKEN),
            Some("tok-abc123".to_string())
        );
    }

    #[test]
    fn test_tolerant_read_returns_raw_string() {
        let storage = memory_storage();
        // Simulate a value the host platform wrote directly, not valid JSON
        storage
            .backend
            .set_item("legacy", "not json at all")
            .unwrap();

        assert_eq!(
            storage.get_value("legacy"),
            Some(serde_json::Value::String("not json at all".to_string()))
        );
    }

    #[test]
    fn test_absent_key_is_none() {
        let storage = memory_storage();
        assert_eq!(storage.get_value("missing"), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let storage = memory_storage();
        storage.set("a", "1");
        storage.set("b", "2");

        storage.remove("a");
        assert_eq!(storage.get_value("a"), None);
        assert!(storage.get_value("b").is_some());

        storage.clear();
        assert_eq!(storage.get_value("b"), None);
    }

    #[test]
    fn test_fail_open_on_broken_backend() {
        // Failures surface as absence, never as panics or errors
        let storage = Storage::new(Arc::new(BrokenBackend));

        storage.set("k", &Blob { a: 1 });
        assert_eq!(storage.get_value("k"), None);
        storage.remove("k");
        storage.clear();
    }

    #[test]
    fn test_mismatched_shape_is_none() {
        let storage = memory_storage();
        storage.set("k", "plain string");
        assert_eq!(storage.get::<Blob>("k"), None);
    }
}
