//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ORDER_EASE_BASE_URL` - Backend API base URL
//!   (default: `http://127.0.0.1:8080/api/order-ease/v1`)
//! - `ORDER_EASE_TIMEOUT_MS` - Request timeout in milliseconds (default: 5000)
//! - `ORDER_EASE_PAGE_SIZE` - Order list page size (default: 20)
//! - `ORDER_EASE_STORAGE` - Storage backend: `memory` or `file`
//!   (default: memory)
//! - `ORDER_EASE_STORAGE_PATH` - File backend path
//!   (default: `order-ease-storage.json`, only used with the file backend)

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/order-ease/v1";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default page size for paginated list fetches.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default path for the file storage backend.
pub const DEFAULT_STORAGE_PATH: &str = "order-ease-storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storage backend selection.
///
/// Resolved once per process; the backend in use never changes at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKind {
    /// Process-local, non-durable storage.
    Memory,
    /// Durable single-file JSON storage.
    File {
        /// Path of the storage file.
        path: PathBuf,
    },
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API base URL. Descriptor URLs without a scheme are appended
    /// to this verbatim.
    pub base_url: String,
    /// Default request timeout in milliseconds; individual requests may
    /// override it.
    pub timeout_ms: u64,
    /// Page size for paginated list fetches.
    pub page_size: usize,
    /// Which persistence backend to use.
    pub storage: StorageKind,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            page_size: DEFAULT_PAGE_SIZE,
            storage: StorageKind::Memory,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. Every
    /// variable has a default, so a bare environment yields a working
    /// development configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid (bad URL,
    /// non-numeric timeout, unknown storage backend).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("ORDER_EASE_BASE_URL", DEFAULT_BASE_URL);
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("ORDER_EASE_BASE_URL".to_string(), e.to_string())
        })?;

        let timeout_ms = parse_env_or_default("ORDER_EASE_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        let page_size = parse_env_or_default("ORDER_EASE_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;

        let storage = storage_kind_from(
            &get_env_or_default("ORDER_EASE_STORAGE", "memory"),
            get_env_or_default("ORDER_EASE_STORAGE_PATH", DEFAULT_STORAGE_PATH),
        )?;

        Ok(Self {
            base_url,
            timeout_ms,
            page_size,
            storage,
        })
    }
}

/// Resolve the storage backend from its configured name.
fn storage_kind_from(kind: &str, path: String) -> Result<StorageKind, ConfigError> {
    match kind {
        "memory" => Ok(StorageKind::Memory),
        "file" => Ok(StorageKind::File { path: path.into() }),
        other => Err(ConfigError::InvalidEnvVar(
            "ORDER_EASE_STORAGE".to_string(),
            format!("unknown backend '{other}' (expected 'memory' or 'file')"),
        )),
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default when unset.
fn parse_env_or_default<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.storage, StorageKind::Memory);
    }

    #[test]
    fn test_storage_kind_memory() {
        let kind = storage_kind_from("memory", "ignored.json".to_string()).unwrap();
        assert_eq!(kind, StorageKind::Memory);
    }

    #[test]
    fn test_storage_kind_file() {
        let kind = storage_kind_from("file", "state.json".to_string()).unwrap();
        assert_eq!(
            kind,
            StorageKind::File {
                path: "state.json".into()
            }
        );
    }

    #[test]
    fn test_storage_kind_unknown() {
        let result = storage_kind_from("sqlite", DEFAULT_STORAGE_PATH.to_string());
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_default_base_url_parses() {
        assert!(Url::parse(DEFAULT_BASE_URL).is_ok());
    }
}
