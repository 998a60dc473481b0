//! Core data types for the Nimbus blob store.
//!
//! This crate defines the domain model shared by every Nimbus backend:
//! blobs and their metadata, listing entries, page sets, and locations.
//! It contains no I/O; storage backends and the listing engine live in
//! their own crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob;
mod location;
mod metadata;
mod page_set;

pub use blob::Blob;
pub use location::Location;
pub use metadata::{BlobMetadata, ContentMetadata, StorageMetadata, StorageType};
pub use page_set::PageSet;
