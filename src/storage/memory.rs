// In-memory browser storage implementation
// Uses HashMap with RwLock for thread-safe access

use super::{BrowserStorage, StorageArea, StorageError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage holding both areas
#[derive(Clone, Default)]
pub struct MemoryBrowserStorage {
    entries: Arc<RwLock<HashMap<(StorageArea, String), String>>>,
}

impl MemoryBrowserStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across both areas
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BrowserStorage for MemoryBrowserStorage {
    async fn get_item(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().await;
        Ok(entries.get(&(area, key.to_string())).cloned())
    }

    async fn set_item(
        &self,
        area: StorageArea,
        key: &str,
        value: &str,
    ) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.insert((area, key.to_string()), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, area: StorageArea, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.remove(&(area, key.to_string()));
        Ok(())
    }
}

/// Storage whose every call fails, as in restricted browsing modes
pub struct UnavailableStorage {
    reason: String,
}

impl UnavailableStorage {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StorageError {
        StorageError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl BrowserStorage for UnavailableStorage {
    async fn get_item(&self, _area: StorageArea, _key: &str) -> Result<Option<String>, StorageError> {
        Err(self.error())
    }

    async fn set_item(
        &self,
        _area: StorageArea,
        _key: &str,
        _value: &str,
    ) -> Result<(), StorageError> {
        Err(self.error())
    }

    async fn remove_item(&self, _area: StorageArea, _key: &str) -> Result<(), StorageError> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_areas_are_independent() {
        let storage = MemoryBrowserStorage::new();

        storage
            .set_item(StorageArea::Durable, "nexora_token", "durable")
            .await
            .unwrap();
        storage
            .set_item(StorageArea::Tab, "nexora_token", "tab")
            .await
            .unwrap();

        storage
            .remove_item(StorageArea::Tab, "nexora_token")
            .await
            .unwrap();

        assert_eq!(
            storage
                .get_item(StorageArea::Durable, "nexora_token")
                .await
                .unwrap(),
            Some("durable".to_string())
        );
        assert_eq!(
            storage.get_item(StorageArea::Tab, "nexora_token").await.unwrap(),
            None
        );
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let storage = MemoryBrowserStorage::new();
        assert!(storage.remove_item(StorageArea::Tab, "missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_unavailable_storage_fails_every_call() {
        let storage = UnavailableStorage::new("quota exceeded");

        let err = storage
            .set_item(StorageArea::Durable, "k", "v")
            .await
            .unwrap_err();
        assert_eq!(err, StorageError::Unavailable("quota exceeded".to_string()));
        assert!(storage.get_item(StorageArea::Durable, "k").await.is_err());
        assert!(storage.remove_item(StorageArea::Tab, "k").await.is_err());
    }
}
