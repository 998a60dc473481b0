//! Blob type pairing metadata with a payload.

use crate::BlobMetadata;
use serde::{Deserialize, Serialize};

/// A blob: metadata plus payload bytes.
///
/// A successfully retrieved blob always carries its payload; there is no
/// metadata-only variant of this type. Header-only reads go through the
/// store's `blob_metadata` operation instead.
///
/// # Examples
///
/// ```
/// use nimbus_core::Blob;
///
/// let blob = Blob::new("notes/today.txt", "ship it");
/// assert_eq!(blob.metadata.name, "notes/today.txt");
/// assert_eq!(blob.metadata.content.content_length, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    /// Metadata describing the payload
    pub metadata: BlobMetadata,
    /// The payload bytes
    pub payload: Vec<u8>,
}

impl Blob {
    /// Create a blob with the given key and payload.
    ///
    /// The content length is stamped from the payload size.
    pub fn new(name: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        let payload = payload.into();
        let mut metadata = BlobMetadata::new(name);
        metadata.content.content_length = payload.len() as u64;
        Self { metadata, payload }
    }

    /// Create a blob from previously loaded metadata and payload.
    pub fn from_parts(metadata: BlobMetadata, payload: Vec<u8>) -> Self {
        Self { metadata, payload }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
