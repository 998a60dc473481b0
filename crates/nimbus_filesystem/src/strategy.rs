//! Filesystem-backed storage strategy implementation.

use crate::validators::{validate_blob_key, validate_container_name};
use crate::FilesystemConfig;
use chrono::{DateTime, Utc};
use nimbus_blobstore::{payload_etag, LocalStorageStrategy};
use nimbus_core::{Blob, BlobMetadata, Location};
use nimbus_error::{NimbusResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Storage strategy mapping containers to subdirectories and blob keys to
/// files under a base directory.
///
/// Nested keys create nested directories. Writes go to a temp file renamed
/// into place, and a failed write never leaves partial output behind.
/// Access is plain filesystem I/O with no locking: concurrent writers to
/// the same key race and the last write wins.
pub struct FilesystemStorageStrategy {
    base_dir: PathBuf,
}

impl FilesystemStorageStrategy {
    /// Create a strategy rooted at the configured base directory.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(config))]
    pub fn new(config: &FilesystemConfig) -> NimbusResult<Self> {
        let base_dir = config.base_dir().clone();

        std::fs::create_dir_all(&base_dir).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_dir.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_dir.display(), "Created filesystem blob storage");
        Ok(Self { base_dir })
    }

    fn container_path(&self, container: &str) -> PathBuf {
        self.base_dir.join(container)
    }

    fn blob_path(&self, container: &str, key: &str) -> PathBuf {
        self.container_path(container).join(key)
    }

    /// Collect container-relative paths of every regular file under `root`.
    async fn walk_keys(&self, root: &Path) -> Result<Vec<String>, std::io::Error> {
        let mut keys = Vec::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file()
                    && let Ok(relative) = entry.path().strip_prefix(root)
                {
                    keys.push(relative.to_string_lossy().into_owned());
                }
            }
        }
        Ok(keys)
    }

    /// Remove now-empty parent directories of a nested key, stopping at the
    /// container root. Best effort only.
    async fn prune_empty_parents(&self, container: &str, key: &str) {
        let container_path = self.container_path(container);
        let mut current = match self.blob_path(container, key).parent() {
            Some(parent) => parent.to_path_buf(),
            None => return,
        };

        while current != container_path && current.starts_with(&container_path) {
            let empty = match tokio::fs::read_dir(&current).await {
                Ok(mut entries) => matches!(entries.next_entry().await, Ok(None)),
                Err(_) => false,
            };
            if !empty {
                return;
            }
            if tokio::fs::remove_dir(&current).await.is_err() {
                tracing::debug!(path = %current.display(), "Could not delete directory");
                return;
            }
            current = match current.parent() {
                Some(parent) => parent.to_path_buf(),
                None => return,
            };
        }
    }
}

#[async_trait::async_trait]
impl LocalStorageStrategy for FilesystemStorageStrategy {
    async fn container_exists(&self, container: &str) -> bool {
        if validate_container_name(container).is_err() {
            return false;
        }
        tokio::fs::metadata(self.container_path(container))
            .await
            .map(|md| md.is_dir())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self, location))]
    async fn create_container(
        &self,
        container: &str,
        location: Option<&Location>,
    ) -> NimbusResult<bool> {
        validate_container_name(container)?;
        if let Some(location) = location {
            tracing::debug!(%location, "Location ignored by the filesystem backend");
        }

        let path = self.container_path(container);
        if self.container_exists(container).await {
            tracing::debug!(path = %path.display(), "Container already exists");
            return Ok(false);
        }

        tokio::fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        tracing::info!(container, path = %path.display(), "Created container");
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_container(&self, container: &str) -> NimbusResult<()> {
        validate_container_name(container)?;
        let path = self.container_path(container);

        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => {
                tracing::info!(container, "Deleted container");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "delete {}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn clear_container(&self, container: &str) -> NimbusResult<()> {
        validate_container_name(container)?;
        let path = self.container_path(container);

        let mut entries = tokio::fs::read_dir(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Enumeration(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::Enumeration(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })? {
            let child = entry.path();
            let removal = if child.is_dir() {
                tokio::fs::remove_dir_all(&child).await
            } else {
                tokio::fs::remove_file(&child).await
            };
            removal.map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    child.display(),
                    e
                )))
            })?;
        }

        tracing::info!(container, "Cleared container");
        Ok(())
    }

    async fn all_container_names(&self) -> NimbusResult<Vec<String>> {
        let mut containers = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.base_dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Enumeration(format!(
                "{}: {}",
                self.base_dir.display(),
                e
            )))
        })?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::Enumeration(format!(
                "{}: {}",
                self.base_dir.display(),
                e
            )))
        })? {
            if entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false) {
                containers.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(containers)
    }

    async fn blob_keys_inside_container(&self, container: &str) -> NimbusResult<Vec<String>> {
        validate_container_name(container)?;
        if !self.container_exists(container).await {
            return Ok(Vec::new());
        }

        let path = self.container_path(container);
        self.walk_keys(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Enumeration(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    async fn blob_exists(&self, container: &str, key: &str) -> bool {
        if validate_container_name(container).is_err() || validate_blob_key(key).is_err() {
            return false;
        }
        tokio::fs::metadata(self.blob_path(container, key))
            .await
            .map(|md| md.is_file())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self))]
    async fn get_blob(&self, container: &str, key: &str) -> NimbusResult<Blob> {
        validate_container_name(container)?;
        validate_blob_key(key)?;
        let path = self.blob_path(container, key);

        let payload = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(format!("{}/{}", container, key)))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;

        let last_modified = tokio::fs::metadata(&path)
            .await
            .ok()
            .and_then(|md| md.modified().ok())
            .map(DateTime::<Utc>::from);

        let mut metadata = BlobMetadata::new(key);
        metadata.etag = Some(payload_etag(&payload));
        metadata.last_modified = last_modified;
        metadata.content.content_length = payload.len() as u64;

        tracing::debug!(
            container,
            key,
            size = payload.len(),
            "Retrieved blob from filesystem"
        );
        Ok(Blob::from_parts(metadata, payload))
    }

    #[tracing::instrument(
        skip(self, blob),
        fields(key = %blob.metadata.name, size = blob.payload.len())
    )]
    async fn put_blob(&self, container: &str, blob: &Blob) -> NimbusResult<()> {
        validate_container_name(container)?;
        validate_blob_key(&blob.metadata.name)?;
        let path = self.blob_path(container, &blob.metadata.name);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        if let Err(e) = tokio::fs::write(&temp_path, &blob.payload).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
            .into());
        }
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }

        tracing::debug!(
            container,
            key = %blob.metadata.name,
            path = %path.display(),
            "Stored blob on filesystem"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_blob(&self, container: &str, key: &str) -> NimbusResult<()> {
        validate_container_name(container)?;
        validate_blob_key(key)?;
        let path = self.blob_path(container, key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(container, key, "Deleted blob"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Could not delete, blob already absent");
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                    "delete {}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        }

        // a nested key may have left empty directories behind
        self.prune_empty_parents(container, key).await;
        Ok(())
    }

    async fn location(&self, _container: &str) -> Option<Location> {
        None
    }
}
