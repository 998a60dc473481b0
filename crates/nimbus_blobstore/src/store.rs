//! Blob store engine layered over a storage strategy.

use crate::{
    list, payload_etag, range, CreateContainerOptions, GetOptions, ListContainerOptions,
    LocalStorageStrategy, DEFAULT_MAX_RESULTS,
};
use nimbus_core::{Blob, BlobMetadata, Location, PageSet, StorageMetadata, StorageType};
use nimbus_error::{
    BlobStoreError, BlobStoreErrorKind, NimbusError, NimbusErrorKind, NimbusResult,
    StorageErrorKind,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Listing and retrieval engine over an injected storage strategy.
///
/// The engine owns the backend-independent semantics: paginated and
/// optionally hierarchical listings, HTTP-style conditional retrieval, byte
/// ranges, and the not-found taxonomy. Raw file-backed CRUD is delegated to
/// the [`LocalStorageStrategy`].
///
/// Every operation is independently invokable; the engine holds no locks and
/// imposes no transaction discipline across operations. A listing running
/// concurrently with a write on another thread may observe a
/// partially-updated namespace.
///
/// # Example
///
/// ```rust,ignore
/// use nimbus_blobstore::{ListContainerOptions, LocalBlobStore};
/// use nimbus_core::Blob;
/// use std::sync::Arc;
///
/// # async fn example(strategy: Arc<dyn nimbus_blobstore::LocalStorageStrategy>) -> nimbus_error::NimbusResult<()> {
/// let store = LocalBlobStore::new(strategy);
/// store.create_container_in_location(None, "photos", &Default::default()).await?;
/// let etag = store.put_blob("photos", Blob::new("cat.png", vec![1, 2, 3])).await?;
/// let page = store.list_container("photos", &ListContainerOptions::default()).await?;
/// assert_eq!(page.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBlobStore {
    strategy: Arc<dyn LocalStorageStrategy>,
}

impl LocalBlobStore {
    /// Create an engine over the given strategy.
    pub fn new(strategy: Arc<dyn LocalStorageStrategy>) -> Self {
        Self { strategy }
    }

    /// Check whether a container exists. Never fails.
    pub async fn container_exists(&self, container: &str) -> bool {
        self.strategy.container_exists(container).await
    }

    /// Create a container.
    ///
    /// # Returns
    ///
    /// `true` if the container was created, `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Public-read access is not supported by local backends and fails with
    /// an unsupported-operation error rather than being silently ignored.
    #[tracing::instrument(skip(self, location, options))]
    pub async fn create_container_in_location(
        &self,
        location: Option<&Location>,
        container: &str,
        options: &CreateContainerOptions,
    ) -> NimbusResult<bool> {
        if *options.public_read() {
            return Err(BlobStoreError::new(BlobStoreErrorKind::UnsupportedOperation(
                "public-read containers".to_string(),
            ))
            .into());
        }
        self.strategy.create_container(container, location).await
    }

    /// Delete a container and everything inside it.
    ///
    /// Deletion is verified: a container still present afterwards is a
    /// strategy-layer failure and is logged, not surfaced as a typed error.
    #[tracing::instrument(skip(self))]
    pub async fn delete_container(&self, container: &str) -> NimbusResult<()> {
        self.strategy.delete_container(container).await?;
        if self.strategy.container_exists(container).await {
            tracing::error!(container, "Container still exists after deletion");
        }
        Ok(())
    }

    /// Remove every blob from a container, leaving the container in place.
    #[tracing::instrument(skip(self))]
    pub async fn clear_container(&self, container: &str) -> NimbusResult<()> {
        if !self.strategy.container_exists(container).await {
            return Err(self.container_not_found(container).await.into());
        }
        self.strategy.clear_container(container).await
    }

    /// List all containers as container-typed entries, without pagination.
    pub async fn list_containers(&self) -> NimbusResult<PageSet> {
        let mut entries = Vec::new();
        for name in self.strategy.all_container_names().await? {
            let location = self.strategy.location(&name).await;
            entries.push(StorageMetadata::container(name, location));
        }
        entries.sort();
        Ok(PageSet::new(entries, None))
    }

    /// List the contents of a container.
    ///
    /// Entries come back in natural string order with no duplicate names.
    /// Marker and prefix filtering operate on the full sorted set, the page
    /// is then truncated to `max_results` (default
    /// [`DEFAULT_MAX_RESULTS`]), and delimiter roll-up along the strategy's
    /// separator runs on the truncated page unless a recursive
    /// listing was requested. Unless the listing is detailed, user metadata
    /// is cleared from every returned entry.
    ///
    /// # Errors
    ///
    /// Fails with a container-not-found error when the container is absent,
    /// and with an invalid-state error when a listed key vanishes before its
    /// metadata can be loaded.
    #[tracing::instrument(skip(self, options))]
    pub async fn list_container(
        &self,
        container: &str,
        options: &ListContainerOptions,
    ) -> NimbusResult<PageSet> {
        if !self.strategy.container_exists(container).await {
            return Err(self.container_not_found(container).await.into());
        }

        let keys = match self.strategy.blob_keys_inside_container(container).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!(container, error = %e, "An error occurred loading the keys of the container");
                return Err(e);
            }
        };

        let mut contents: BTreeMap<String, StorageMetadata> = BTreeMap::new();
        for key in keys {
            let blob = match self.strategy.get_blob(container, &key).await {
                Ok(blob) => blob,
                Err(e) if is_not_found(&e) => {
                    return Err(BlobStoreError::new(BlobStoreErrorKind::InvalidState(format!(
                        "blob {} is not present although it was in the list of {}",
                        key, container
                    )))
                    .into());
                }
                Err(e) => return Err(e),
            };
            let normalized = blob.metadata.normalized_copy();
            let mut md = StorageMetadata::from(&normalized);
            if let Some(directory_name) = list::directory_marker_name(&normalized) {
                md.name = directory_name;
                md.kind = StorageType::RelativePath;
                md.etag = None;
                md.last_modified = None;
                md.size = None;
            }
            contents.insert(md.name.clone(), md);
        }

        if let Some(marker) = options.marker() {
            list::apply_marker(&mut contents, marker);
        }
        if let Some(prefix) = options.prefix() {
            list::apply_prefix(&mut contents, prefix);
        }

        let max_results = (*options.max_results()).unwrap_or(DEFAULT_MAX_RESULTS);
        let next_marker = list::truncate(&mut contents, max_results);

        if !options.recursive() {
            list::roll_up(
                &mut contents,
                options.prefix().as_deref(),
                self.strategy.separator(),
            );
        }

        if !options.detailed() {
            for md in contents.values_mut() {
                md.user_metadata.clear();
            }
        }

        Ok(PageSet::new(contents.into_values().collect(), next_marker))
    }

    /// Retrieve a blob, honoring conditional-request and byte-range options.
    ///
    /// Returns `Ok(None)` when the key does not exist in an existing
    /// container; an absent container is an error. The returned blob never
    /// aliases strategy-held state and always carries a payload.
    ///
    /// # Errors
    ///
    /// Conditional failures surface as typed outcomes: precondition-failed
    /// (412 semantics) for a stale `if_match` or `if_unmodified_since`, and
    /// not-modified (304 semantics) for a matched `if_none_match` or a stale
    /// `if_modified_since`. Malformed ranges fail with an invalid-range
    /// error.
    #[tracing::instrument(skip(self, options))]
    pub async fn get_blob(
        &self,
        container: &str,
        key: &str,
        options: &GetOptions,
    ) -> NimbusResult<Option<Blob>> {
        tracing::debug!(container, key, "Retrieving blob");
        if !self.strategy.container_exists(container).await {
            tracing::debug!(container, "Container does not exist");
            return Err(self.container_not_found(container).await.into());
        }
        if !self.strategy.blob_exists(container, key).await {
            tracing::debug!(container, key, "Blob does not exist in container");
            return Ok(None);
        }

        let loaded = self.strategy.get_blob(container, key).await?;

        if let Some(expected) = options.if_match() {
            if loaded.metadata.etag.as_deref() != Some(expected.as_str()) {
                return Err(BlobStoreError::new(BlobStoreErrorKind::PreconditionFailed(format!(
                    "if-match {} does not equal the current etag",
                    expected
                )))
                .into());
            }
        }
        if let Some(absent) = options.if_none_match() {
            if loaded.metadata.etag.as_deref() == Some(absent.as_str()) {
                return Err(BlobStoreError::new(BlobStoreErrorKind::NotModified(format!(
                    "if-none-match {} equals the current etag",
                    absent
                )))
                .into());
            }
        }
        if let (Some(modified_since), Some(last_modified)) =
            (options.if_modified_since(), loaded.metadata.last_modified)
        {
            if last_modified < *modified_since {
                return Err(BlobStoreError::new(BlobStoreErrorKind::NotModified(format!(
                    "{} is before {}",
                    last_modified, modified_since
                )))
                .into());
            }
        }
        if let (Some(unmodified_since), Some(last_modified)) =
            (options.if_unmodified_since(), loaded.metadata.last_modified)
        {
            if last_modified > *unmodified_since {
                return Err(BlobStoreError::new(BlobStoreErrorKind::PreconditionFailed(format!(
                    "{} is after {}",
                    last_modified, unmodified_since
                )))
                .into());
            }
        }

        // never hand back metadata aliasing the strategy's view
        let mut blob = Blob::from_parts(loaded.metadata.normalized_copy(), loaded.payload);

        if !options.ranges().is_empty() {
            let sliced = range::apply_ranges(&blob.payload, options.ranges())?;
            blob.metadata.content.content_length = sliced.len() as u64;
            blob.payload = sliced;
        }

        Ok(Some(blob))
    }

    /// Store a blob under its key, overwriting any previous payload.
    ///
    /// # Returns
    ///
    /// The blob's ETag: the hex-encoded MD5 of the payload, also stamped
    /// into the persisted metadata.
    ///
    /// # Errors
    ///
    /// Fails with a container-not-found error when the container is absent;
    /// a persistence failure propagates after a single attempt.
    #[tracing::instrument(
        skip(self, blob),
        fields(key = %blob.metadata.name, size = blob.payload.len())
    )]
    pub async fn put_blob(&self, container: &str, mut blob: Blob) -> NimbusResult<String> {
        tracing::debug!(container, key = %blob.metadata.name, "Putting blob");
        if !self.strategy.container_exists(container).await {
            return Err(self.container_not_found(container).await.into());
        }

        let etag = payload_etag(&blob.payload);
        blob.metadata.etag = Some(etag.clone());
        blob.metadata.content.content_length = blob.payload.len() as u64;

        match self.strategy.put_blob(container, &blob).await {
            Ok(()) => Ok(etag),
            Err(e) => {
                tracing::error!(
                    container,
                    key = %blob.metadata.name,
                    error = %e,
                    "An error occurred storing the blob"
                );
                Err(e)
            }
        }
    }

    /// Check whether a blob exists. Never fails.
    pub async fn blob_exists(&self, container: &str, key: &str) -> bool {
        self.strategy.blob_exists(container, key).await
    }

    /// Remove a blob. Removing an absent key from an existing container is
    /// not an error; an absent container is.
    #[tracing::instrument(skip(self))]
    pub async fn remove_blob(&self, container: &str, key: &str) -> NimbusResult<()> {
        if !self.strategy.container_exists(container).await {
            return Err(self.container_not_found(container).await.into());
        }
        self.strategy.remove_blob(container, key).await
    }

    /// Load a blob's metadata without its payload.
    ///
    /// Returns `Ok(None)` for a missing key, distinguishing not-found from
    /// transport-level failures; an absent container is an error. The
    /// returned metadata is a normalized copy with lowercased user-metadata
    /// keys.
    #[tracing::instrument(skip(self))]
    pub async fn blob_metadata(
        &self,
        container: &str,
        key: &str,
    ) -> NimbusResult<Option<BlobMetadata>> {
        if !self.strategy.container_exists(container).await {
            return Err(self.container_not_found(container).await.into());
        }
        if !self.strategy.blob_exists(container, key).await {
            return Ok(None);
        }
        let blob = self.strategy.get_blob(container, key).await?;
        Ok(Some(blob.metadata.normalized_copy()))
    }

    async fn container_not_found(&self, container: &str) -> BlobStoreError {
        let known_containers = self.strategy.all_container_names().await.unwrap_or_default();
        BlobStoreError::new(BlobStoreErrorKind::ContainerNotFound {
            container: container.to_string(),
            known_containers,
        })
    }
}

fn is_not_found(err: &NimbusError) -> bool {
    matches!(
        err.kind(),
        NimbusErrorKind::Storage(se) if matches!(se.kind, StorageErrorKind::NotFound(_))
    )
}
