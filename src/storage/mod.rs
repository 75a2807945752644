// Browser-side key/value storage abstraction
// Models the durable (local) and tab-scoped (session) storage areas

pub mod memory;

pub use memory::{MemoryBrowserStorage, UnavailableStorage};

use async_trait::async_trait;
use tracing::debug;

use crate::security::SensitiveKeys;

/// Storage area a key lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    /// Survives restarts (localStorage)
    Durable,
    /// Cleared when the tab closes (sessionStorage)
    Tab,
}

impl StorageArea {
    pub const ALL: [StorageArea; 2] = [StorageArea::Durable, StorageArea::Tab];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageArea::Durable => "durable",
            StorageArea::Tab => "tab",
        }
    }
}

/// Errors raised by storage backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage API refused access (restricted browsing mode, quota, ...)
    Unavailable(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Key/value storage with two areas
#[async_trait]
pub trait BrowserStorage: Send + Sync {
    async fn get_item(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, area: StorageArea, key: &str, value: &str)
    -> Result<(), StorageError>;

    /// Removing a missing key is not an error
    async fn remove_item(&self, area: StorageArea, key: &str) -> Result<(), StorageError>;
}

/// Remove every sensitive key from both areas.
///
/// Failures are absorbed; each key and area is attempted independently.
/// Returns the number of removals that succeeded.
pub async fn clear_sensitive_storage(storage: &dyn BrowserStorage, keys: &SensitiveKeys) -> usize {
    let mut removed = 0;

    for key in keys.iter() {
        for area in StorageArea::ALL {
            match storage.remove_item(area, key).await {
                Ok(()) => removed += 1,
                Err(e) => debug!(
                    "Ignoring storage error while clearing '{}' from {} storage: {}",
                    key,
                    area.as_str(),
                    e
                ),
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clear_sensitive_storage_removes_both_areas() {
        let storage = MemoryBrowserStorage::new();
        let keys = SensitiveKeys::default();

        for key in keys.iter() {
            storage.set_item(StorageArea::Durable, key, "secret").await.unwrap();
            storage.set_item(StorageArea::Tab, key, "secret").await.unwrap();
        }
        storage
            .set_item(StorageArea::Durable, "nexora_medications", "[]")
            .await
            .unwrap();

        let removed = clear_sensitive_storage(&storage, &keys).await;
        assert_eq!(removed, 8);

        for key in keys.iter() {
            for area in StorageArea::ALL {
                assert_eq!(storage.get_item(area, key).await.unwrap(), None);
            }
        }

        // Non-sensitive entries survive
        assert_eq!(
            storage
                .get_item(StorageArea::Durable, "nexora_medications")
                .await
                .unwrap(),
            Some("[]".to_string())
        );
    }

    #[tokio::test]
    async fn test_clear_sensitive_storage_is_idempotent() {
        let storage = MemoryBrowserStorage::new();
        let keys = SensitiveKeys::default();
        storage.set_item(StorageArea::Tab, "nexora_token", "t").await.unwrap();

        clear_sensitive_storage(&storage, &keys).await;
        clear_sensitive_storage(&storage, &keys).await;

        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_sensitive_storage_absorbs_unavailable_storage() {
        let storage = UnavailableStorage::new("private browsing");
        let removed = clear_sensitive_storage(&storage, &SensitiveKeys::default()).await;
        assert_eq!(removed, 0);
    }
}
