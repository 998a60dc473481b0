//! Filesystem backend configuration.

use config::{Config, Environment, File};
use derive_getters::Getters;
use nimbus_error::{ConfigError, NimbusError, NimbusResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Configuration for the filesystem storage strategy.
///
/// # Examples
///
/// ```
/// use nimbus_filesystem::FilesystemConfig;
///
/// let config = FilesystemConfig::new("/var/nimbus/storage");
/// assert!(config.base_dir().ends_with("storage"));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_", into)]
#[serde(deny_unknown_fields)]
pub struct FilesystemConfig {
    /// Root directory holding one subdirectory per container
    base_dir: PathBuf,
}

impl FilesystemConfig {
    /// Create a configuration rooted at the given directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Creates a new configuration builder.
    pub fn builder() -> FilesystemConfigBuilder {
        FilesystemConfigBuilder::default()
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> NimbusResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                NimbusError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                NimbusError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration from `./nimbus.toml` and the environment.
    ///
    /// `NIMBUS_`-prefixed environment variables override values from the
    /// file; the file itself is optional, but a base directory must come
    /// from one of the two sources.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nimbus_filesystem::FilesystemConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = FilesystemConfig::load()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> NimbusResult<Self> {
        debug!("Loading configuration: environment > ./nimbus.toml");

        Config::builder()
            .add_source(File::with_name("nimbus").required(false))
            .add_source(Environment::with_prefix("NIMBUS"))
            .build()
            .map_err(|e| {
                NimbusError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                NimbusError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
