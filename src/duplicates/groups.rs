//! Duplicate grouping and size-based file organization.
//!
//! # Overview
//!
//! This module provides the keyed grouping used by both detection phases,
//! the size partitioning step (Phase 1), and the confirmed
//! [`DuplicateGroup`] type produced by Phase 2.
//!
//! ## Size Grouping (Phase 1)
//!
//! Files with different sizes cannot be duplicates, so grouping by exact size
//! and dropping singleton sizes removes most files before any content is read.
//!
//! # Example
//!
//! ```
//! use similar_files::scanner::FileEntry;
//! use similar_files::duplicates::group_by_size;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileEntry::new(PathBuf::from("/file1.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file2.txt"), 1024),
//!     FileEntry::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! // Group by size - only groups with 2+ files are potential duplicates
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);
//! assert_eq!(groups.len(), 1);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::path::PathBuf;

use serde::Serialize;

use crate::scanner::{FileEntry, Fingerprint};

/// Final result of [`check_for_duplicates`](crate::check_for_duplicates):
/// fingerprint to the paths sharing it, each list holding two or more paths.
pub type DuplicateGroups = BTreeMap<Fingerprint, Vec<PathBuf>>;

/// Insertion-ordered multimap from a scan key to the values sharing it.
///
/// Appending to an absent key creates its group first. Groups are kept in
/// the order their keys were first seen, and values within a group in the
/// order they were appended.
#[derive(Debug, Clone)]
pub struct GroupMap<K, V> {
    index: HashMap<K, usize>,
    groups: Vec<(K, Vec<V>)>,
}

impl<K, V> Default for GroupMap<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> GroupMap<K, V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the group for `key`, creating the group if needed.
    pub fn append(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&slot) => self.groups[slot].1.push(value),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![value]));
            }
        }
    }

    /// Values currently stored under `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.index.get(key).map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no value has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Keep only groups with two or more values, in first-seen order.
    #[must_use]
    pub fn into_duplicates(self) -> Vec<(K, Vec<V>)> {
        self.groups
            .into_iter()
            .filter(|(_, values)| values.len() > 1)
            .collect()
    }
}

/// A group of files with the same size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size, in walk order
    pub files: Vec<FileEntry>,
}

impl SizeGroup {
    /// Create a size group with initial files.
    #[must_use]
    pub fn with_files(size: u64, files: Vec<FileEntry>) -> Self {
        Self { size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Check if this group has potential duplicates (2+ files).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.files.len() > 1
    }

    /// Paths of the files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Content fingerprint shared by every file in the group
    pub fingerprint: Fingerprint,
    /// File size in bytes
    pub size: u64,
    /// The duplicate files, in walk order
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(fingerprint: Fingerprint, size: u64, files: Vec<FileEntry>) -> Self {
        Self {
            fingerprint,
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total wasted space (all copies minus one).
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Collapse confirmed groups into the fingerprint-to-paths map.
#[must_use]
pub fn to_duplicate_map(groups: &[DuplicateGroup]) -> DuplicateGroups {
    groups
        .iter()
        .map(|g| (g.fingerprint.clone(), g.paths()))
        .collect()
}

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of empty files encountered
    pub empty_files: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size (Phase 1 of duplicate detection).
///
/// Returns only the buckets holding two or more files, in the order their
/// size was first seen. Empty files are grouped like any other size: two
/// empty files are duplicates of each other.
///
/// # Example
///
/// ```
/// use similar_files::scanner::FileEntry;
/// use similar_files::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileEntry::new(PathBuf::from("/a.txt"), 100),
///     FileEntry::new(PathBuf::from("/b.txt"), 100),
///     FileEntry::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].size, 100);
/// assert_eq!(stats.eliminated_unique, 1);
/// ```
#[must_use]
pub fn group_by_size(files: impl IntoIterator<Item = FileEntry>) -> (Vec<SizeGroup>, GroupingStats) {
    let mut by_size: GroupMap<u64, FileEntry> = GroupMap::new();
    let mut stats = GroupingStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_size += file.size;
        if file.size == 0 {
            stats.empty_files += 1;
        }
        by_size.append(file.size, file);
    }

    stats.unique_sizes = by_size.len();

    let groups: Vec<SizeGroup> = by_size
        .into_duplicates()
        .into_iter()
        .map(|(size, files)| {
            log::debug!("Size group {} bytes: {} potential duplicates", size, files.len());
            SizeGroup::with_files(size, files)
        })
        .collect();

    stats.duplicate_groups = groups.len();
    stats.potential_duplicates = groups.iter().map(SizeGroup::len).sum();
    stats.eliminated_unique = stats.total_files - stats.potential_duplicates;

    log::info!(
        "Phase 1 complete: {} files → {} potential duplicates ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.elimination_rate()
    );

    (groups, stats)
}
