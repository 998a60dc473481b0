//! Local-directory storage strategy for the Nimbus blob store.
//!
//! This backend maps the blob namespace directly onto a directory tree: one
//! subdirectory per container, one file per key. Keys containing the
//! platform path separator create nested directories, which is exactly why
//! delimiter-based listing uses that same separator.
//!
//! The backend owns raw file CRUD only; listing, pagination, and
//! conditional-request semantics come from the engine in `nimbus_blobstore`.
//!
//! # Example
//!
//! ```rust,no_run
//! use nimbus_blobstore::LocalBlobStore;
//! use nimbus_filesystem::{FilesystemConfig, FilesystemStorageStrategy};
//! use std::sync::Arc;
//!
//! # fn main() -> nimbus_error::NimbusResult<()> {
//! let config = FilesystemConfig::new("/var/nimbus/storage");
//! let strategy = FilesystemStorageStrategy::new(&config)?;
//! let store = LocalBlobStore::new(Arc::new(strategy));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod strategy;
mod validators;

pub use config::{FilesystemConfig, FilesystemConfigBuilder};
pub use strategy::FilesystemStorageStrategy;
