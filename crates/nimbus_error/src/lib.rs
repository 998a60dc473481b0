//! Error types for the Nimbus blob store.
//!
//! This crate provides the foundation error types used throughout the Nimbus
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use nimbus_error::{NimbusResult, StorageError, StorageErrorKind};
//!
//! fn read_payload() -> NimbusResult<Vec<u8>> {
//!     Err(StorageError::new(StorageErrorKind::FileRead("/tmp/missing".into())))?
//! }
//!
//! match read_payload() {
//!     Ok(data) => println!("Got {} bytes", data.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blobstore;
mod config;
mod error;
mod storage;

pub use blobstore::{BlobStoreError, BlobStoreErrorKind};
pub use config::ConfigError;
pub use error::{NimbusError, NimbusErrorKind, NimbusResult};
pub use storage::{StorageError, StorageErrorKind};
