//! Storage strategy trait definition.

use md5::{Digest, Md5};
use nimbus_core::{Blob, Location};
use nimbus_error::NimbusResult;

/// Trait for pluggable local storage backends.
///
/// Implementations own the raw file-backed CRUD: container directories, key
/// enumeration, and byte persistence. The listing, pagination, and
/// conditional-request semantics layered on top live in
/// [`LocalBlobStore`](crate::LocalBlobStore) and are backend-independent.
///
/// Implementations must be safe for concurrent use by multiple operation
/// invocations; no atomicity across operations is expected of them.
#[async_trait::async_trait]
pub trait LocalStorageStrategy: Send + Sync {
    /// Check whether a container exists. Pure query, never fails.
    async fn container_exists(&self, container: &str) -> bool;

    /// Create a container, optionally tagged with a location.
    ///
    /// # Returns
    ///
    /// `true` if the container was created, `false` if it already existed.
    async fn create_container(
        &self,
        container: &str,
        location: Option<&Location>,
    ) -> NimbusResult<bool>;

    /// Delete a container and everything inside it.
    async fn delete_container(&self, container: &str) -> NimbusResult<()>;

    /// Remove every blob from a container, leaving the container in place.
    async fn clear_container(&self, container: &str) -> NimbusResult<()>;

    /// Names of all containers known to this backend.
    async fn all_container_names(&self) -> NimbusResult<Vec<String>>;

    /// Every blob key inside a container, including nested keys.
    ///
    /// # Errors
    ///
    /// Returns an enumeration-kind storage error when the walk fails.
    async fn blob_keys_inside_container(&self, container: &str) -> NimbusResult<Vec<String>>;

    /// Check whether a blob exists. Pure query, never fails.
    async fn blob_exists(&self, container: &str, key: &str) -> bool;

    /// Load a blob assumed present per a prior existence check.
    async fn get_blob(&self, container: &str, key: &str) -> NimbusResult<Blob>;

    /// Persist a blob's payload under its key.
    ///
    /// # Errors
    ///
    /// Returns a write-kind storage error on persistence failure; partial
    /// output must not be left behind.
    async fn put_blob(&self, container: &str, blob: &Blob) -> NimbusResult<()>;

    /// Remove a blob. Removing an absent key is not an error.
    async fn remove_blob(&self, container: &str, key: &str) -> NimbusResult<()>;

    /// Location metadata for a container, when the backend has any.
    async fn location(&self, container: &str) -> Option<Location>;

    /// The hierarchy delimiter for keys in this backend.
    fn separator(&self) -> char {
        std::path::MAIN_SEPARATOR
    }
}

/// ETag convention shared by local backends: hex-encoded MD5 of the payload.
///
/// # Examples
///
/// ```
/// use nimbus_blobstore::payload_etag;
///
/// assert_eq!(payload_etag(b""), "d41d8cd98f00b204e9800998ecf8427e");
/// ```
pub fn payload_etag(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
