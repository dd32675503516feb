//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Content fingerprint matching (Phase 2)
//! - Duplicate group management

pub mod finder;
pub mod groups;

pub use finder::{
    check_for_duplicates, match_contents, DuplicateFinder, FinderConfig, FinderError, HashConfig,
    HashStats, ScanSummary, DEFAULT_IO_THREADS,
};
pub use groups::{
    group_by_size, to_duplicate_map, DuplicateGroup, DuplicateGroups, GroupMap, GroupingStats,
    SizeGroup,
};
