//! Duplicate finder implementation with two-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Phase 1 - Size grouping**: Walk the tree and group files by size
//!    (see [`crate::duplicates::groups`] module)
//! 2. **Phase 2 - Content matching**: Hash every file in a candidate size
//!    group and keep fingerprints shared by two or more files
//!
//! # Example
//!
//! ```no_run
//! use similar_files::scanner::{Walker, WalkerConfig, FileEntry, Hasher};
//! use similar_files::duplicates::{group_by_size, match_contents, HashConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! // Phase 1: Collect and group files by size
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let files: Vec<FileEntry> = walker.walk().filter_map(Result::ok).collect();
//! let (size_groups, _) = group_by_size(files);
//!
//! // Phase 2: Hash candidates and group by fingerprint
//! let hasher = Arc::new(Hasher::new());
//! let (groups, stats) = match_contents(size_groups, hasher, HashConfig::default());
//!
//! println!("{} duplicate groups, {} bytes reclaimable", groups.len(), stats.wasted_space);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use super::groups::{group_by_size, to_duplicate_map, DuplicateGroup, DuplicateGroups, GroupMap, SizeGroup};
use crate::progress::ProgressCallback;
use crate::scanner::{
    FileEntry, Fingerprint, HashAlgorithm, HashError, Hasher, ScanError, Walker, WalkerConfig,
    DEFAULT_CHUNK_SIZE,
};

/// Default number of hashing threads.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Files above this size get a debug line when hashing starts.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024;

// ============================================================================
// Phase 2 - Content Matching
// ============================================================================

/// Configuration for the content matching phase.
#[derive(Clone)]
pub struct HashConfig {
    /// Number of worker threads reading files concurrently
    pub io_threads: usize,
    /// Optional shutdown flag, checked before each file
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashConfig")
            .field("io_threads", &self.io_threads)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl HashConfig {
    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Statistics from the content matching phase.
#[derive(Debug, Default)]
pub struct HashStats {
    /// Number of candidate files handed to the phase
    pub input_files: usize,
    /// Number of files successfully hashed
    pub hashed_files: usize,
    /// Number of files that could not be hashed
    pub failed_files: usize,
    /// The per-file errors, in input order
    pub errors: Vec<HashError>,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Number of duplicate files (excluding one original per group)
    pub duplicate_files: usize,
    /// Space reclaimable by keeping one copy per group
    pub wasted_space: u64,
    /// Whether hashing stopped early because of a shutdown request
    pub interrupted: bool,
}

impl HashStats {
    fn record_groups(&mut self, groups: &[DuplicateGroup]) {
        self.duplicate_groups = groups.len();
        self.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        self.wasted_space = groups.iter().map(DuplicateGroup::wasted_space).sum();
    }
}

/// Build the bounded hashing pool, or `None` to run on rayon's global pool.
fn build_pool(io_threads: usize) -> Option<rayon::ThreadPool> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(io_threads.max(1))
        .thread_name(|i| format!("similar-files-hash-{i}"))
        .build()
    {
        Ok(pool) => Some(pool),
        Err(e) => {
            log::warn!(
                "Failed to create hashing pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            None
        }
    }
}

/// Hash candidate files and group them by fingerprint (Phase 2).
///
/// Files are hashed in parallel on a pool of `io_threads` workers. Results
/// are collected in input order and grouped on the calling thread, so groups
/// and the paths inside them follow walk order. Fingerprints are compared
/// across all size groups combined; only fingerprints shared by two or more
/// files survive.
///
/// Files that fail to hash are left out of every group and reported in
/// [`HashStats::errors`]. When the shutdown flag is raised, remaining files
/// are skipped and [`HashStats::interrupted`] is set.
#[must_use]
pub fn match_contents(
    size_groups: Vec<SizeGroup>,
    hasher: Arc<Hasher>,
    config: HashConfig,
) -> (Vec<DuplicateGroup>, HashStats) {
    let candidates: Vec<FileEntry> = size_groups.into_iter().flat_map(|g| g.files).collect();
    let mut stats = HashStats {
        input_files: candidates.len(),
        ..Default::default()
    };

    if candidates.is_empty() {
        log::debug!("Phase 2: No candidates to hash");
        return (Vec::new(), stats);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hashing", candidates.len());
    }

    log::info!(
        "Phase 2: Hashing {} candidate files with {} ({} threads)",
        candidates.len(),
        hasher.algorithm(),
        config.io_threads
    );

    let completed = AtomicUsize::new(0);

    let hash_one = |file: FileEntry| -> (FileEntry, Option<Result<Fingerprint, HashError>>) {
        if config.is_shutdown_requested() {
            return (file, None);
        }

        if file.size > LARGE_FILE_THRESHOLD {
            log::debug!(
                "Hashing large file ({} MB): {}",
                file.size / (1024 * 1024),
                file.path.display()
            );
        }

        let result = hasher.hash_file(&file.path);

        // Workers finish out of order; report how many are done, not the index.
        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = config.progress_callback {
            callback.on_item_completed(file.size);
            callback.on_progress(done, file.path.to_string_lossy().as_ref());
        }

        (file, Some(result))
    };

    let hash_all = || -> Vec<_> {
        candidates
            .into_par_iter()
            .map(hash_one)
            .collect()
    };

    let results = match build_pool(config.io_threads) {
        Some(pool) => pool.install(hash_all),
        None => hash_all(),
    };

    let mut by_fingerprint: GroupMap<Fingerprint, FileEntry> = GroupMap::new();

    for (file, outcome) in results {
        match outcome {
            None => stats.interrupted = true,
            Some(Ok(fingerprint)) => {
                log::trace!("{}  {}", fingerprint, file.path.display());
                stats.hashed_files += 1;
                stats.bytes_hashed += file.size;
                by_fingerprint.append(fingerprint, file);
            }
            Some(Err(e)) if e.is_interrupted() => stats.interrupted = true,
            Some(Err(e)) => {
                log::warn!("Skipping {}: {}", e.path().display(), e);
                stats.failed_files += 1;
                stats.errors.push(e);
            }
        }
    }

    let groups: Vec<DuplicateGroup> = by_fingerprint
        .into_duplicates()
        .into_iter()
        .map(|(fingerprint, files)| {
            let size = files.first().map_or(0, |f| f.size);
            DuplicateGroup::new(fingerprint, size, files)
        })
        .collect();

    stats.record_groups(&groups);

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hashing");
    }

    log::info!(
        "Phase 2 complete: {} groups, {} duplicates, {} bytes reclaimable",
        stats.duplicate_groups,
        stats.duplicate_files,
        stats.wasted_space
    );

    (groups, stats)
}

// ============================================================================
// DuplicateFinder - Pipeline Orchestrator
// ============================================================================

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Fail-fast on the first per-file error.
    pub strict: bool,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Content hash algorithm.
    pub algorithm: HashAlgorithm,
    /// Read size for the chunked hashing loop.
    pub chunk_size: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("strict", &self.strict)
            .field("walker_config", &self.walker_config)
            .field("algorithm", &self.algorithm)
            .field("chunk_size", &self.chunk_size)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            strict: false,
            walker_config: WalkerConfig::default(),
            algorithm: HashAlgorithm::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set fail-fast on any error.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the content hash algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the hashing chunk size in bytes.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn hash_config(&self) -> HashConfig {
        HashConfig {
            io_threads: self.io_threads,
            shutdown_flag: self.shutdown_flag.clone(),
            progress_callback: self.progress_callback.clone(),
        }
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Total number of files walked
    pub total_files: usize,
    /// Total size of all walked files in bytes
    pub total_size: u64,
    /// Number of files eliminated by size grouping (unique sizes)
    pub eliminated_by_size: usize,
    /// Number of empty files walked
    pub empty_files: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Bytes read during content matching
    pub bytes_hashed: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Non-fatal errors skipped during the scan
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize(self.total_size).to_string()
    }

    /// Whether some files were skipped because of errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root path exists but could not be inspected.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A per-file error aborted a strict scan.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl FinderError {
    /// Whether the error was caused by a bad root path.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::PathNotFound(_) | Self::NotADirectory(_))
    }
}

/// Check that `root` exists and is a directory.
fn validate_root(root: &Path) -> Result<(), FinderError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FinderError::NotADirectory(root.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(FinderError::PathNotFound(root.to_path_buf()))
        }
        Err(source) => Err(FinderError::Io {
            path: root.to_path_buf(),
            source,
        }),
    }
}

/// Duplicate finder that orchestrates the two-phase detection pipeline.
///
/// 1. **Walk + Phase 1** - Collect every regular file and group by size
/// 2. **Phase 2** - Hash same-size files and group by fingerprint
///
/// # Example
///
/// ```no_run
/// use similar_files::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let config = FinderConfig::default().with_io_threads(4);
/// let finder = DuplicateFinder::new(config);
///
/// let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
///
/// println!("Found {} duplicate groups", summary.duplicate_groups);
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Arc<Hasher>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new()
            .with_algorithm(config.algorithm)
            .with_chunk_size(config.chunk_size);
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self {
            config,
            hasher: Arc::new(hasher),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The finder's configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Walk `root` and return every regular file found, in walk order.
    ///
    /// Walk errors are recorded in `summary` or, in strict mode, returned.
    fn collect_files(
        &self,
        root: &Path,
        summary: &mut ScanSummary,
    ) -> Result<Vec<FileEntry>, FinderError> {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", root.display()));
        }

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        let mut files = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(files.len() + 1, file.path.to_string_lossy().as_ref());
                    }
                    files.push(file);
                }
                Err(e) if self.config.strict => return Err(FinderError::Scan(e)),
                Err(e) => {
                    log::warn!("Skipping {}: {}", e.path().display(), e);
                    summary.scan_errors.push(e);
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        Ok(files)
    }

    /// Group the regular files under `root` by size (Phase 1).
    ///
    /// Returns only size groups with two or more files, together with the
    /// summary gathered so far.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`]
    /// for a bad root, [`FinderError::Interrupted`] on shutdown, and
    /// [`FinderError::Scan`] for walk errors in strict mode.
    pub fn partition_by_size(
        &self,
        root: &Path,
    ) -> Result<(Vec<SizeGroup>, ScanSummary), FinderError> {
        validate_root(root)?;

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut summary = ScanSummary::default();
        let files = self.collect_files(root, &mut summary)?;
        let (size_groups, size_stats) = group_by_size(files);

        summary.total_files = size_stats.total_files;
        summary.total_size = size_stats.total_size;
        summary.eliminated_by_size = size_stats.eliminated_unique;
        summary.empty_files = size_stats.empty_files;

        Ok((size_groups, summary))
    }

    /// Find all duplicate files under `root`.
    ///
    /// Runs both phases and returns the confirmed groups, in walk order of
    /// their first member, along with summary statistics.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist or is not a directory
    /// - The scan is interrupted by shutdown signal
    /// - A file cannot be read and strict mode is enabled
    ///
    /// # Example
    ///
    /// ```no_run
    /// use similar_files::duplicates::DuplicateFinder;
    /// use std::path::Path;
    ///
    /// let finder = DuplicateFinder::with_defaults();
    /// match finder.find_duplicates(Path::new(".")) {
    ///     Ok((groups, summary)) => {
    ///         println!("Found {} duplicate groups", groups.len());
    ///         println!("Can reclaim {} bytes", summary.reclaimable_space);
    ///     }
    ///     Err(e) => eprintln!("Scan failed: {}", e),
    /// }
    /// ```
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        log::info!("Starting duplicate scan of {}", root.display());

        let (size_groups, mut summary) = self.partition_by_size(root)?;

        log::info!(
            "Found {} files ({})",
            summary.total_files,
            summary.total_size_display()
        );

        let groups = self.match_and_summarize(size_groups, &mut summary)?;
        summary.scan_duration = start_time.elapsed();
        Ok((groups, summary))
    }

    /// Find duplicates from a pre-collected list of files.
    ///
    /// Use this method when the files come from another source than the
    /// walker. Entries are grouped by their recorded size; the files are
    /// only opened during content matching.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] on shutdown and
    /// [`FinderError::Scan`] for hash errors in strict mode.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileEntry>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let (size_groups, size_stats) = group_by_size(files);
        let mut summary = ScanSummary {
            total_files: size_stats.total_files,
            total_size: size_stats.total_size,
            eliminated_by_size: size_stats.eliminated_unique,
            empty_files: size_stats.empty_files,
            ..Default::default()
        };

        let groups = self.match_and_summarize(size_groups, &mut summary)?;
        summary.scan_duration = start_time.elapsed();
        Ok((groups, summary))
    }

    fn match_and_summarize(
        &self,
        size_groups: Vec<SizeGroup>,
        summary: &mut ScanSummary,
    ) -> Result<Vec<DuplicateGroup>, FinderError> {
        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if size_groups.is_empty() {
            log::info!("No potential duplicates found after size grouping");
            return Ok(Vec::new());
        }

        let (groups, mut hash_stats) =
            match_contents(size_groups, self.hasher.clone(), self.config.hash_config());

        if hash_stats.interrupted || self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        if self.config.strict && !hash_stats.errors.is_empty() {
            let first = hash_stats.errors.swap_remove(0);
            return Err(FinderError::Scan(ScanError::Hash(first)));
        }

        summary
            .scan_errors
            .extend(hash_stats.errors.into_iter().map(ScanError::from));
        summary.duplicate_groups = hash_stats.duplicate_groups;
        summary.duplicate_files = hash_stats.duplicate_files;
        summary.reclaimable_space = hash_stats.wasted_space;
        summary.bytes_hashed = hash_stats.bytes_hashed;

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display()
        );

        Ok(groups)
    }
}

/// Scan `root` and map each shared fingerprint to the paths holding it.
///
/// Uses the default configuration: MD5 over 1 KiB chunks, symlinks not
/// followed, hidden files included, unreadable files skipped.
///
/// # Errors
///
/// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`]
/// when `root` is not a directory.
///
/// # Example
///
/// ```no_run
/// use similar_files::check_for_duplicates;
/// use std::path::Path;
///
/// for (hash, paths) in check_for_duplicates(Path::new(".")).unwrap() {
///     println!("{hash}: {paths:?}");
/// }
/// ```
pub fn check_for_duplicates(root: impl AsRef<Path>) -> Result<DuplicateGroups, FinderError> {
    let (groups, _) = DuplicateFinder::with_defaults().find_duplicates(root.as_ref())?;
    Ok(to_duplicate_map(&groups))
}
