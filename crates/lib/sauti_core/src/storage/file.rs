//! File-backed key-value storage.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{KeyValueStorage, StorageError};

/// Key-value storage persisted as a single JSON object file.
///
/// Writes are atomic: temp file, then rename. A mutex serializes
/// read-modify-write cycles within this process.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Storage at the default platform location
    /// (`<data dir>/sauti/storage.json`).
    pub fn new() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sauti")
            .join("storage.json");
        Self::with_path(path)
    }

    /// Storage at an explicit path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Read the whole map, treating a missing file as empty.
    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the whole map atomically: temp file, then rename.
    async fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.store(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_in(dir: &tempfile::TempDir) -> FileStorage {
        FileStorage::with_path(dir.path().join("storage.json"))
    }

    #[tokio::test]
    async fn get_returns_none_for_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        assert!(storage.get("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        storage.set("token", "abc123").await.unwrap();
        assert_eq!(storage.get("token").await.unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = storage_in(&dir);
            storage.set("user", "{\"id\":\"u1\"}").await.unwrap();
        }
        let reopened = storage_in(&dir);
        assert_eq!(
            reopened.get("user").await.unwrap().as_deref(),
            Some("{\"id\":\"u1\"}")
        );
    }

    #[tokio::test]
    async fn remove_deletes_key_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);
        storage.set("token", "abc").await.unwrap();
        storage.remove("token").await.unwrap();
        assert!(storage.get("token").await.unwrap().is_none());
        storage.remove("token").await.unwrap();
    }
}
