use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{BrokerError, BrokerResult};
use crate::storage::{FileStorage, InMemoryStorage, Storage};

/// Top-level settings file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    /// Upper bound on a live connection check (dial + ping).
    #[serde(default = "default_verify_timeout", with = "humantime_serde")]
    pub verify_timeout: Duration,
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageSettings {
    File {
        #[serde(default = "default_storage_path")]
        path: PathBuf,
    },
    Memory,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self::File {
            path: default_storage_path(),
        }
    }
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            verify_timeout: default_verify_timeout(),
            listen: default_listen(),
        }
    }
}

fn default_verify_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_listen() -> String {
    "127.0.0.1:8200".into()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data")
}

impl BrokerSettings {
    pub fn from_file(path: &Path) -> BrokerResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BrokerError::Config(format!("Cannot read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> BrokerResult<Self> {
        let settings: Self = serde_yaml::from_str(content)
            .map_err(|e| BrokerError::Config(format!("Invalid YAML: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> BrokerResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> BrokerResult<()> {
        if self.verify_timeout.is_zero() {
            return Err(BrokerError::Config(
                "verify_timeout must be greater than zero".into(),
            ));
        }
        if self.listen.trim().is_empty() {
            return Err(BrokerError::Config("listen must not be empty".into()));
        }
        if let StorageSettings::File { path } = &self.storage {
            if path.as_os_str().is_empty() {
                return Err(BrokerError::Config("storage.path must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Build the storage backend described by these settings.
    pub async fn open_storage(&self) -> BrokerResult<Arc<dyn Storage>> {
        match &self.storage {
            StorageSettings::File { path } => {
                tracing::debug!(path = %path.display(), "Opening file storage");
                Ok(Arc::new(FileStorage::open(path).await?))
            }
            StorageSettings::Memory => {
                tracing::warn!("Using in-memory storage; configuration is lost on exit");
                Ok(Arc::new(InMemoryStorage::new()))
            }
        }
    }
}
