//! Name validation for containers and blob keys.
//!
//! Containers become directory names and keys become relative paths, so a
//! handful of shapes can never be stored: empty names, containers carrying a
//! path separator, and keys that would escape the container by starting with
//! one.

use nimbus_error::{NimbusResult, StorageError, StorageErrorKind};
use std::path::MAIN_SEPARATOR;

/// Check that a container name maps to a single directory component.
pub(crate) fn validate_container_name(container: &str) -> NimbusResult<()> {
    if container.is_empty() {
        return Err(StorageError::new(StorageErrorKind::InvalidName(
            "container name is empty".to_string(),
        ))
        .into());
    }
    if container.contains(MAIN_SEPARATOR) {
        return Err(StorageError::new(StorageErrorKind::InvalidName(format!(
            "container name {} contains a path separator",
            container
        )))
        .into());
    }
    Ok(())
}

/// Check that a blob key stays inside its container directory.
pub(crate) fn validate_blob_key(key: &str) -> NimbusResult<()> {
    if key.is_empty() {
        return Err(StorageError::new(StorageErrorKind::InvalidName(
            "blob key is empty".to_string(),
        ))
        .into());
    }
    if key.starts_with(MAIN_SEPARATOR) {
        return Err(StorageError::new(StorageErrorKind::InvalidName(format!(
            "blob key {} starts with a path separator",
            key
        )))
        .into());
    }
    Ok(())
}
