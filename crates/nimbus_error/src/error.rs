//! Top-level error wrapper types.

use crate::{BlobStoreError, ConfigError, StorageError};

/// This is the foundation error enum. Each Nimbus crate surfaces its failures
/// through one of these variants.
///
/// # Examples
///
/// ```
/// use nimbus_error::{NimbusError, ConfigError};
///
/// let config_err = ConfigError::new("base_dir is empty");
/// let err: NimbusError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum NimbusErrorKind {
    /// Blob store operation error
    #[from(BlobStoreError)]
    BlobStore(BlobStoreError),
    /// Storage strategy error
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Nimbus error with kind discrimination.
///
/// # Examples
///
/// ```
/// use nimbus_error::{NimbusResult, StorageError, StorageErrorKind};
///
/// fn might_fail() -> NimbusResult<()> {
///     Err(StorageError::new(StorageErrorKind::NotFound("key".into())))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Nimbus Error: {}", _0)]
pub struct NimbusError(Box<NimbusErrorKind>);

impl NimbusError {
    /// Create a new error from a kind.
    pub fn new(kind: NimbusErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &NimbusErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to NimbusErrorKind
impl<T> From<T> for NimbusError
where
    T: Into<NimbusErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Nimbus operations.
///
/// # Examples
///
/// ```
/// use nimbus_error::{NimbusResult, ConfigError};
///
/// fn load_config() -> NimbusResult<String> {
///     Err(ConfigError::new("no config file found"))?
/// }
/// ```
pub type NimbusResult<T> = std::result::Result<T, NimbusError>;
