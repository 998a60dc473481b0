//! Nimbus - Local Blob Store
//!
//! Nimbus provides object-storage semantics over a flat namespace of string
//! keys scoped under containers, backed by a local directory tree: one
//! subdirectory per container, one file per key.
//!
//! # Features
//!
//! - **Directory-style listings**: name-ordered, paginated with a resumable
//!   marker, filtered by prefix, rolled up into synthetic directory entries
//!   along the platform path separator
//! - **Conditional retrieval**: `if-match`, `if-none-match`, and
//!   modification-timestamp preconditions with typed 304/412-style outcomes
//! - **Partial content**: multi-range byte retrieval with HTTP-style closed
//!   intervals
//! - **Pluggable backends**: the engine is generic over a storage strategy
//!   trait; the filesystem strategy ships in the box
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use nimbus::{
//!     Blob, FilesystemConfig, FilesystemStorageStrategy, GetOptions, ListContainerOptions,
//!     LocalBlobStore,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> nimbus::NimbusResult<()> {
//!     let config = FilesystemConfig::new("/var/nimbus/storage");
//!     let store = nimbus::filesystem_blob_store(&config)?;
//!
//!     store
//!         .create_container_in_location(None, "photos", &Default::default())
//!         .await?;
//!     let etag = store
//!         .put_blob("photos", Blob::new("cat.png", vec![1, 2, 3]))
//!         .await?;
//!     println!("stored with etag {}", etag);
//!
//!     let page = store
//!         .list_container("photos", &ListContainerOptions::default())
//!         .await?;
//!     for entry in &page {
//!         println!("{} ({})", entry.name, entry.kind);
//!     }
//!
//!     if let Some(blob) = store.get_blob("photos", "cat.png", &GetOptions::default()).await? {
//!         println!("read back {} bytes", blob.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telemetry;

pub use nimbus_blobstore::{
    payload_etag, ByteRange, CreateContainerOptions, GetOptions, ListContainerOptions,
    LocalBlobStore, LocalStorageStrategy, DEFAULT_MAX_RESULTS,
};
pub use nimbus_core::{
    Blob, BlobMetadata, ContentMetadata, Location, PageSet, StorageMetadata, StorageType,
};
pub use nimbus_error::{
    BlobStoreError, BlobStoreErrorKind, ConfigError, NimbusError, NimbusErrorKind, NimbusResult,
    StorageError, StorageErrorKind,
};
pub use nimbus_filesystem::{FilesystemConfig, FilesystemStorageStrategy};
pub use telemetry::init_telemetry;

use std::sync::Arc;

/// Build a blob store over the filesystem strategy in one step.
///
/// # Errors
///
/// Returns error if the configured base directory cannot be created.
pub fn filesystem_blob_store(config: &FilesystemConfig) -> NimbusResult<LocalBlobStore> {
    let strategy = FilesystemStorageStrategy::new(config)?;
    Ok(LocalBlobStore::new(Arc::new(strategy)))
}
