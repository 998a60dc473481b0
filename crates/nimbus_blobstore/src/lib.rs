//! Container listing and conditional retrieval engine for Nimbus.
//!
//! This crate layers object-storage semantics over a flat namespace of
//! string keys scoped under containers:
//!
//! - **Listings**: name-ordered, paginated with a resumable marker, filtered
//!   by prefix, and optionally rolled up into directory-style entries using
//!   the backend's hierarchy delimiter.
//! - **Retrieval**: HTTP-style conditional requests (`if-match`,
//!   `if-none-match`, modification timestamps) and multi-range partial
//!   content, expressed as typed outcomes rather than status codes.
//!
//! The raw file-backed CRUD lives behind the [`LocalStorageStrategy`] trait;
//! the engine itself is backend-independent. The filesystem backend ships in
//! its own crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use nimbus_blobstore::{GetOptions, LocalBlobStore};
//!
//! # async fn example(store: LocalBlobStore) -> nimbus_error::NimbusResult<()> {
//! let options = GetOptions::default().with_range(0, 1023);
//! if let Some(blob) = store.get_blob("photos", "cat.png", &options).await? {
//!     println!("first KiB: {} bytes", blob.len());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod list;
mod options;
mod range;
mod store;
mod strategy;

pub use nimbus_error::{BlobStoreError, BlobStoreErrorKind, StorageError, StorageErrorKind};
pub use options::{
    ByteRange, CreateContainerOptions, GetOptions, ListContainerOptions, DEFAULT_MAX_RESULTS,
};
pub use store::LocalBlobStore;
pub use strategy::{payload_etag, LocalStorageStrategy};
