//! Streaming file hasher.
//!
//! # Overview
//!
//! [`Hasher`] computes a [`Fingerprint`] for a file by reading it through a
//! fixed-size buffer and feeding each chunk into a hash accumulator. Memory use
//! is bounded by the chunk size regardless of how large the file is.
//!
//! The algorithm is configurable. MD5 is the default because a 128-bit digest
//! is plenty for grouping files that already share an exact byte size.
//!
//! # Example
//!
//! ```no_run
//! use similar_files::scanner::{HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new().with_algorithm(HashAlgorithm::Sha256);
//! let fingerprint = hasher.hash_file(Path::new("notes.txt")).unwrap();
//! println!("{fingerprint}");
//! ```

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::HashError;

/// Default read size for the chunked hashing loop, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Hash algorithm used to fingerprint file contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, 128-bit digest
    #[default]
    Md5,
    /// SHA-256, 256-bit digest
    Sha256,
    /// BLAKE3, 256-bit digest
    Blake3,
}

impl HashAlgorithm {
    /// All supported algorithms.
    pub const ALL: [HashAlgorithm; 3] = [Self::Md5, Self::Sha256, Self::Blake3];

    /// Length of the hex-encoded digest.
    #[must_use]
    pub fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 | Self::Blake3 => 64,
        }
    }

    fn accumulator(self) -> Accumulator {
        match self {
            Self::Md5 => Accumulator::Md5(Md5::new()),
            Self::Sha256 => Accumulator::Sha256(Sha256::new()),
            Self::Blake3 => Accumulator::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "blake3" => Ok(Self::Blake3),
            other => Err(format!(
                "Unknown hash algorithm '{other}' (expected md5, sha256 or blake3)"
            )),
        }
    }
}

/// Hex digest of a file's full content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Build a fingerprint from raw digest bytes.
    #[must_use]
    pub fn from_digest(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// The lowercase hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Running hash state, one variant per algorithm.
enum Accumulator {
    Md5(Md5),
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl Accumulator {
    fn update(&mut self, chunk: &[u8]) {
        match self {
            Self::Md5(h) => h.update(chunk),
            Self::Sha256(h) => h.update(chunk),
            Self::Blake3(h) => {
                h.update(chunk);
            }
        }
    }

    fn finalize(self) -> Fingerprint {
        match self {
            Self::Md5(h) => Fingerprint::from_digest(&h.finalize()),
            Self::Sha256(h) => Fingerprint::from_digest(&h.finalize()),
            Self::Blake3(h) => Fingerprint::from_digest(h.finalize().as_bytes()),
        }
    }
}

/// Chunked file hasher.
///
/// A `Hasher` holds no per-file state, so one instance can be shared across
/// worker threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    chunk_size: usize,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher using MD5 and 1 KiB chunks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
        }
    }

    /// Select the hash algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read size for each chunk. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the shutdown flag, checked between chunks.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The configured chunk size in bytes.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Hash the full content of the file at `path`.
    ///
    /// The file handle is closed when this returns, whether hashing finished,
    /// failed, or was interrupted.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read, or
    /// [`HashError::Interrupted`] if the shutdown flag is raised mid-file.
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(&mut file, path)
    }

    /// Hash everything readable from `reader`. `path` is only used for errors.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::hash_file`].
    pub fn hash_reader<R: Read>(&self, reader: &mut R, path: &Path) -> Result<Fingerprint, HashError> {
        let mut accumulator = self.algorithm.accumulator();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            if self.is_shutdown_requested() {
                log::debug!("Hashing interrupted: {}", path.display());
                return Err(HashError::Interrupted(path.to_path_buf()));
            }

            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => accumulator.update(&buffer[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            }
        }

        Ok(accumulator.finalize())
    }

    /// Hash an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> Fingerprint {
        let mut accumulator = self.algorithm.accumulator();
        accumulator.update(data);
        accumulator.finalize()
    }
}

/// Fingerprint a file with the default algorithm (MD5).
///
/// # Errors
///
/// Returns [`HashError`] if the file cannot be opened or read.
///
/// # Example
///
/// ```no_run
/// let fp = similar_files::get_hash("hello.txt").unwrap();
/// assert_eq!(fp.as_str().len(), 32);
/// ```
pub fn get_hash(path: impl AsRef<Path>) -> Result<Fingerprint, HashError> {
    get_hash_with(path, HashAlgorithm::default())
}

/// Fingerprint a file with an explicit algorithm.
///
/// # Errors
///
/// Returns [`HashError`] if the file cannot be opened or read.
pub fn get_hash_with(path: impl AsRef<Path>, algorithm: HashAlgorithm) -> Result<Fingerprint, HashError> {
    Hasher::new().with_algorithm(algorithm).hash_file(path.as_ref())
}
