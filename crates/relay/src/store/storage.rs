//! Storage backends for the order document.
//!
//! A backend only moves bytes; parsing and validation live in
//! [`OrderStore`](super::OrderStore).

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

/// Whole-document persistence.
///
/// Implementations must replace the entire document on every
/// [`write`](DocumentStorage::write); there are no partial updates.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Read the raw document, or `None` if nothing has been written yet.
    async fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the document with `bytes`.
    async fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}

/// Document stored in a single JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a backend for `path`. The file is not touched until first use.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl DocumentStorage for FileStorage {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write beside the target and rename so readers never see half a document
        let temp = self.temp_path();
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Document held in process memory. Used by tests and local experiments.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    contents: Mutex<Option<Vec<u8>>>,
}

impl MemoryStorage {
    /// Empty backend, as if no document had been written yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-loaded with raw bytes.
    #[must_use]
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Mutex::new(Some(bytes.into())),
        }
    }

    /// Snapshot of the stored bytes.
    pub async fn contents(&self) -> Option<Vec<u8>> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStorage for MemoryStorage {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.contents.lock().await.clone())
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        *self.contents.lock().await = Some(bytes.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_storage_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("db.json"));

        assert!(storage.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("db.json"));

        storage.write(b"{\"pedidos\":[]}").await.unwrap();
        storage.write(b"{\"pedidos\":[1]}").await.unwrap();

        assert_eq!(
            storage.read().await.unwrap().as_deref(),
            Some(&b"{\"pedidos\":[1]}"[..])
        );
        assert!(!storage.temp_path().exists());
    }

    #[tokio::test]
    async fn test_file_storage_location_is_path() {
        let storage = FileStorage::new("data/db.json");
        assert_eq!(storage.location(), Path::new("data/db.json").display().to_string());
    }

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.read().await.unwrap().is_none());

        storage.write(b"abc").await.unwrap();
        assert_eq!(storage.contents().await.as_deref(), Some(&b"abc"[..]));
    }
}
