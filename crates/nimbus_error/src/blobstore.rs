//! Blob store operation error types.

/// Kinds of blob store errors.
///
/// `NotModified` and `PreconditionFailed` mirror the HTTP 304 and 412
/// conventions for conditional requests, expressed as typed outcomes rather
/// than status codes. Translation to wire status is the transport's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BlobStoreErrorKind {
    /// The requested container does not exist
    #[display("Container {} not found (known containers: {:?})", container, known_containers)]
    ContainerNotFound {
        /// The container that was requested
        container: String,
        /// The containers that do exist, for diagnostics
        known_containers: Vec<String>,
    },
    /// Conditional request matched the current state (HTTP 304 semantics)
    #[display("Not modified: {}", _0)]
    NotModified(String),
    /// Conditional request precondition failed (HTTP 412 semantics)
    #[display("Precondition failed: {}", _0)]
    PreconditionFailed(String),
    /// Byte range specifier is malformed, inverted, or out of bounds
    #[display("Invalid range: {}", _0)]
    InvalidRange(String),
    /// The backend does not support the requested option
    #[display("Unsupported operation: {}", _0)]
    UnsupportedOperation(String),
    /// Internal consistency violation between enumeration and load
    #[display("Invalid state: {}", _0)]
    InvalidState(String),
}

/// Blob store error with location tracking.
///
/// # Examples
///
/// ```
/// use nimbus_error::{BlobStoreError, BlobStoreErrorKind};
///
/// let err = BlobStoreError::new(BlobStoreErrorKind::ContainerNotFound {
///     container: "photos".to_string(),
///     known_containers: vec!["documents".to_string()],
/// });
/// assert!(format!("{}", err).contains("photos"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Blob Store Error: {} at line {} in {}", kind, line, file)]
pub struct BlobStoreError {
    /// The kind of error that occurred
    pub kind: BlobStoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BlobStoreError {
    /// Create a new blob store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BlobStoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
