//! Storage-strategy error types.

/// Kinds of storage-strategy errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a blob file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read a blob file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Failed to enumerate keys inside a container
    #[display("Failed to enumerate container: {}", _0)]
    Enumeration(String),
    /// Blob not found at the specified location
    #[display("Blob not found: {}", _0)]
    NotFound(String),
    /// Container name or blob key is not acceptable to this backend
    #[display("Invalid name: {}", _0)]
    InvalidName(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use nimbus_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("bucket/key".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
