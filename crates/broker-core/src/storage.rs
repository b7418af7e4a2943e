use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::error::{BrokerError, BrokerResult};

/// A single key/value pair as held by a [`Storage`] backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEntry {
    pub key: String,
    pub value: Vec<u8>,
}

impl StorageEntry {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Encode `value` as JSON under `key`.
    pub fn json<T: Serialize>(key: impl Into<String>, value: &T) -> BrokerResult<Self> {
        let key = key.into();
        let value = serde_json::to_vec(value)
            .map_err(|e| BrokerError::Encode(format!("{key}: {e}")))?;
        Ok(Self { key, value })
    }

    pub fn decode_json<T: DeserializeOwned>(&self) -> BrokerResult<T> {
        serde_json::from_slice(&self.value)
            .map_err(|e| BrokerError::Decode(format!("{}: {e}", self.key)))
    }
}

/// Durable key/value store the backend persists its configuration into.
///
/// Implementations must make a single `put` atomic: readers observe either
/// the previous value or the new one, never a torn write.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> BrokerResult<Option<StorageEntry>>;

    async fn put(&self, entry: StorageEntry) -> BrokerResult<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get(&self, key: &str) -> BrokerResult<Option<StorageEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .map(|value| StorageEntry::new(key, value.clone())))
    }

    async fn put(&self, entry: StorageEntry) -> BrokerResult<()> {
        self.entries.write().await.insert(entry.key, entry.value);
        Ok(())
    }
}

/// One file per key below a root directory. Slashes in a key become
/// subdirectories.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub async fn open(root: impl AsRef<Path>) -> BrokerResult<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            BrokerError::storage(format!("Cannot create {}", root.display()), e)
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> BrokerResult<PathBuf> {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(BrokerError::storage(
                    "Invalid storage key",
                    anyhow::anyhow!("'{key}' contains an empty or relative segment"),
                ));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> BrokerResult<Option<StorageEntry>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(value) => Ok(Some(StorageEntry::new(key, value))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BrokerError::storage(format!("Cannot read '{key}'"), e)),
        }
    }

    async fn put(&self, entry: StorageEntry) -> BrokerResult<()> {
        let path = self.path_for(&entry.key)?;
        let StorageEntry { key, value } = entry;
        let bytes = value.len();

        tokio::task::spawn_blocking(move || replace_file(&path, &value))
            .await
            .map_err(|e| BrokerError::storage(format!("Cannot write '{key}'"), e))?
            .map_err(|e| BrokerError::storage(format!("Cannot write '{key}'"), e))?;

        tracing::trace!(key = %key, bytes, "Stored entry");
        Ok(())
    }
}

/// Write `value` to a fresh temp file beside `path`, then rename it over
/// `path`. Each call gets its own temp file, so overlapping writers never
/// share one.
fn replace_file(path: &Path, value: &[u8]) -> std::io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent")
    })?;
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(value)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
