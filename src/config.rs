//! Layered scan configuration.
//!
//! Settings are merged with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file: `--config <FILE>` or `<platform config dir>/similar-files/config.toml`
//! 3. Environment variables prefixed `SIMILAR_FILES_` (e.g. `SIMILAR_FILES_IO_THREADS=8`)
//! 4. Command-line flags (applied by the caller on the extracted [`Config`])
//!
//! A missing config file is not an error. A malformed one is.
//!
//! ```toml
//! algorithm = "sha256"
//! chunk_size = 65536
//! io_threads = 8
//! skip_hidden = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::duplicates::{FinderConfig, DEFAULT_IO_THREADS};
use crate::scanner::{HashAlgorithm, WalkerConfig, DEFAULT_CHUNK_SIZE};

/// Environment variable prefix for configuration keys.
pub const ENV_PREFIX: &str = "SIMILAR_FILES_";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A provider produced data that does not fit [`Config`].
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    /// A value is out of range.
    #[error("Invalid configuration: {key} must be at least 1")]
    Zero {
        /// Offending key
        key: &'static str,
    },
}

/// Scan settings that can come from a file or the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content hash algorithm
    pub algorithm: HashAlgorithm,
    /// Read size for each hashing chunk, in bytes
    pub chunk_size: usize,
    /// Number of hashing threads
    pub io_threads: usize,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
    /// Skip dot-files and dot-directories
    pub skip_hidden: bool,
    /// Abort on the first unreadable file
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            io_threads: DEFAULT_IO_THREADS,
            follow_symlinks: false,
            skip_hidden: false,
            strict: false,
        }
    }
}

impl Config {
    /// Platform config file location, if a home directory can be resolved.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "similar-files").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from `path` (or the platform default when `None`) and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file or environment holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let figment = Self::figment(path.as_deref()).merge(Env::prefixed(ENV_PREFIX));
        Self::extract(&figment)
    }

    /// Load from defaults and one TOML file only, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file holds invalid values.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::extract(&Self::figment(Some(path)))
    }

    fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        match path {
            Some(path) => {
                log::debug!("Reading configuration from {}", path.display());
                figment.merge(Toml::file(path))
            }
            None => figment,
        }
    }

    fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Zero`] for a zero chunk size or thread count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Zero { key: "chunk_size" });
        }
        if self.io_threads == 0 {
            return Err(ConfigError::Zero { key: "io_threads" });
        }
        Ok(())
    }

    /// Build the finder configuration these settings describe.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_algorithm(self.algorithm)
            .with_chunk_size(self.chunk_size)
            .with_io_threads(self.io_threads)
            .with_strict(self.strict)
            .with_walker_config(WalkerConfig::new(self.follow_symlinks, self.skip_hidden))
    }
}
