//! Metadata types for blobs and listing entries.

use crate::Location;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The kind of entry a listing can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageType {
    /// A stored blob
    Blob,
    /// A synthetic directory entry produced by delimiter roll-up or a
    /// directory marker
    RelativePath,
    /// A container, in root listings
    Container,
}

impl StorageType {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Blob => "blob",
            StorageType::RelativePath => "relative-path",
            StorageType::Container => "container",
        }
    }
}

impl std::str::FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blob" => Ok(StorageType::Blob),
            "relative-path" => Ok(StorageType::RelativePath),
            "container" => Ok(StorageType::Container),
            _ => Err(format!("Unknown storage type: {}", s)),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a listing result.
///
/// Entries compare, hash, and order by `name` alone, giving listings
/// sorted-set semantics: natural string ordering with no duplicate names.
///
/// # Examples
///
/// ```
/// use nimbus_core::{StorageMetadata, StorageType};
///
/// let a = StorageMetadata::relative_path("photos");
/// let b = StorageMetadata::relative_path("videos");
/// assert!(a < b);
/// assert_eq!(a.kind, StorageType::RelativePath);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageMetadata {
    /// Key, or common-prefix directory name
    pub name: String,
    /// What kind of entry this is
    pub kind: StorageType,
    /// Content hash, present for blob entries
    pub etag: Option<String>,
    /// Modification timestamp, present for blob entries
    pub last_modified: Option<DateTime<Utc>>,
    /// Payload size in bytes, present for blob entries
    pub size: Option<u64>,
    /// User-supplied key/value pairs, keys normalized to lowercase
    pub user_metadata: HashMap<String, String>,
    /// Provider/region handle, populated on container entries
    pub location: Option<Location>,
}

impl StorageMetadata {
    /// Create a synthetic directory entry.
    pub fn relative_path(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StorageType::RelativePath,
            etag: None,
            last_modified: None,
            size: None,
            user_metadata: HashMap::new(),
            location: None,
        }
    }

    /// Create a container entry for a root listing.
    pub fn container(name: impl Into<String>, location: Option<Location>) -> Self {
        Self {
            name: name.into(),
            kind: StorageType::Container,
            etag: None,
            last_modified: None,
            size: None,
            user_metadata: HashMap::new(),
            location,
        }
    }
}

impl From<&BlobMetadata> for StorageMetadata {
    fn from(md: &BlobMetadata) -> Self {
        Self {
            name: md.name.clone(),
            kind: StorageType::Blob,
            etag: md.etag.clone(),
            last_modified: md.last_modified,
            size: Some(md.content.content_length),
            user_metadata: md.user_metadata.clone(),
            location: None,
        }
    }
}

impl PartialEq for StorageMetadata {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for StorageMetadata {}

impl std::hash::Hash for StorageMetadata {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for StorageMetadata {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StorageMetadata {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// Content headers carried alongside a blob payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentMetadata {
    /// Payload size in bytes
    pub content_length: u64,
    /// MIME type, when known
    pub content_type: Option<String>,
    /// Content-Disposition header value, when set
    pub content_disposition: Option<String>,
    /// Content-Encoding header value, when set
    pub content_encoding: Option<String>,
}

/// Per-blob record: identity, content hash, timestamps, and headers.
///
/// Created on put, replaced wholesale on overwrite, destroyed on removal.
/// There is no partial metadata update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobMetadata {
    /// Key, unique within a container
    pub name: String,
    /// Hex-encoded MD5 of the payload
    pub etag: Option<String>,
    /// Modification timestamp
    pub last_modified: Option<DateTime<Utc>>,
    /// Content headers
    pub content: ContentMetadata,
    /// User-supplied key/value pairs
    pub user_metadata: HashMap<String, String>,
}

impl BlobMetadata {
    /// Create metadata for a new blob with the given key.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            etag: None,
            last_modified: None,
            content: ContentMetadata::default(),
            user_metadata: HashMap::new(),
        }
    }

    /// Explicit deep copy with user-metadata keys lowercased.
    ///
    /// Returned metadata never aliases the source, so callers may mutate it
    /// freely without touching backend-held state.
    ///
    /// # Examples
    ///
    /// ```
    /// use nimbus_core::BlobMetadata;
    ///
    /// let mut md = BlobMetadata::new("report.txt");
    /// md.user_metadata.insert("Author".to_string(), "ada".to_string());
    ///
    /// let copy = md.normalized_copy();
    /// assert_eq!(copy.user_metadata.get("author"), Some(&"ada".to_string()));
    /// ```
    pub fn normalized_copy(&self) -> Self {
        let user_metadata = self
            .user_metadata
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect();
        Self {
            name: self.name.clone(),
            etag: self.etag.clone(),
            last_modified: self.last_modified,
            content: self.content.clone(),
            user_metadata,
        }
    }

    /// Normalized copy under a new key.
    pub fn renamed_copy(&self, name: impl Into<String>) -> Self {
        let mut copy = self.normalized_copy();
        copy.name = name.into();
        copy
    }
}
