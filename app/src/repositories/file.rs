//! JSON file user store
//!
//! Keeps the aggregate as pretty-printed JSON in a single file. Writes go to
//! a sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous save intact.

use async_trait::async_trait;
use companionfit_core::User;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{StoreError, UserStore};

/// File-backed [`UserStore`]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn load(&self) -> Result<Option<User>, StoreError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        let user = serde_json::from_str(&json).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        debug!(path = %self.path.display(), "Loaded user");
        Ok(Some(user))
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.ensure_parent().await?;

        let json = serde_json::to_string_pretty(user)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, json)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        debug!(path = %self.path.display(), user_id = %user.id, "Saved user");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }
}
