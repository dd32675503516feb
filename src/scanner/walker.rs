//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and collecting the byte size of every regular file in it. No file content
//! is read here.
//!
//! The walk is a single sequential traversal. Entries within each directory
//! are visited in file-name order, so repeated walks of an unchanged tree
//! yield the same sequence.
//!
//! # Features
//!
//! - Recursion to any depth
//! - Optional symlink following (walkdir reports cycles as errors)
//! - Hidden file filtering
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use similar_files::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops before yielding the
    /// next entry.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration, so the caller decides whether one unreadable entry should
    /// abort the scan.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && is_hidden(entry)))
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry),
                Err(e) => Some(Err(self.convert_walk_error(e))),
            })
    }

    /// Turn a directory entry into a [`FileEntry`] if it is a regular file.
    fn process_entry(&self, entry: DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        if file_type.is_dir() {
            return None;
        }

        // With follow_links on, walkdir reports the target's type, so a
        // symlink type here means we are not following links.
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.convert_walk_error(e))),
        };

        // Sockets, FIFOs and device nodes have no meaningful content to compare
        if !metadata.is_file() {
            log::trace!("Skipping non-regular file: {}", entry.path().display());
            return None;
        }

        let size = metadata.len();
        if size == 0 {
            log::trace!("Empty file: {}", entry.path().display());
        }

        Some(Ok(FileEntry::new(entry.into_path(), size)))
    }

    /// Convert a walkdir error into a [`ScanError`], logging it.
    fn convert_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            log::warn!("Symlink loop detected: {}", path.display());
            return ScanError::SymlinkLoop(path);
        }

        let message = error.to_string();
        match error.into_io_error() {
            Some(io_error) => {
                let err = ScanError::from_io(&path, io_error);
                match &err {
                    ScanError::NotFound(_) => {
                        log::debug!("File not found (may have been deleted): {}", path.display());
                    }
                    _ => log::warn!("{}", err),
                }
                err
            }
            None => {
                log::warn!("Walker error for {}: {}", path.display(), message);
                ScanError::Io {
                    path,
                    source: std::io::Error::other(message),
                }
            }
        }
    }
}

/// Whether the entry's own name starts with a dot. The root is never hidden.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_name().as_encoded_bytes().first() == Some(&b'.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Create a test directory with some files.
    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        let mut f = File::create(dir.path().join("file1.txt")).unwrap();
        writeln!(f, "Hello, world!").unwrap();

        let mut f = File::create(dir.path().join("file2.txt")).unwrap();
        writeln!(f, "Another file").unwrap();

        let subdir = dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        let mut f = File::create(subdir.join("nested.txt")).unwrap();
        writeln!(f, "Nested file content").unwrap();

        dir
    }

    fn names(files: &[FileEntry]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_walker_finds_files() {
        let dir = create_test_dir();
        let walker = Walker::new(dir.path(), WalkerConfig::default());

        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 3);
        for file in &files {
            assert!(file.size > 0);
            assert!(file.path.exists());
            assert!(file.path.starts_with(dir.path()));
        }
    }

    #[test]
    fn test_walker_reports_sizes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("five.bin"), b"12345").unwrap();

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files, vec![FileEntry::new(dir.path().join("five.bin"), 5)]);
    }

    #[test]
    fn test_walker_includes_empty_files() {
        let dir = create_test_dir();
        File::create(dir.path().join("empty.txt")).unwrap();

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 4);
        assert!(files.iter().any(|f| f.size == 0));
    }

    #[test]
    fn test_walker_deep_nesting() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("a").join("b").join("c").join("d");
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("bottom.txt"), "deep").unwrap();

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(names(&files), vec!["bottom.txt"]);
    }

    #[test]
    fn test_walker_order_is_stable() {
        let dir = create_test_dir();
        let walker = Walker::new(dir.path(), WalkerConfig::default());

        let first: Vec<_> = walker.walk().filter_map(Result::ok).collect();
        let second: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_walker_skip_hidden_files() {
        let dir = create_test_dir();

        let mut f = File::create(dir.path().join(".hidden")).unwrap();
        writeln!(f, "Hidden content").unwrap();
        let hidden_dir = dir.path().join(".cache");
        fs::create_dir(&hidden_dir).unwrap();
        fs::write(hidden_dir.join("visible_name.txt"), "inside hidden dir").unwrap();

        let config = WalkerConfig {
            skip_hidden: true,
            ..Default::default()
        };
        let walker = Walker::new(dir.path(), config);
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| !f.path.starts_with(&hidden_dir)));

        // Without the flag both hidden entries are walked
        let walker = Walker::new(dir.path(), WalkerConfig::default());
        assert_eq!(walker.walk().filter_map(Result::ok).count(), 5);
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_skips_hidden_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;
        let dir = TempDir::new().unwrap();
        let name = std::ffi::OsStr::from_bytes(&[b'.', 0xff, 0xfe]);

        // Some filesystems reject non-UTF-8 names
        if fs::write(dir.path().join(name), b"hidden").is_err() {
            return;
        }
        fs::write(dir.path().join("shown.txt"), b"shown").unwrap();

        let config = WalkerConfig {
            skip_hidden: true,
            ..Default::default()
        };
        let files: Vec<_> = Walker::new(dir.path(), config)
            .walk()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("shown.txt"));
    }

    #[test]
    fn test_walker_shutdown_flag() {
        let dir = create_test_dir();
        for i in 0..10 {
            fs::write(dir.path().join(format!("extra{i}.txt")), format!("Content {i}")).unwrap();
        }

        let shutdown = Arc::new(AtomicBool::new(true));
        let walker = Walker::new(dir.path(), WalkerConfig::default())
            .with_shutdown_flag(Arc::clone(&shutdown));

        assert_eq!(walker.walk().count(), 0);
    }

    #[test]
    fn test_walker_handles_nonexistent_path() {
        let walker = Walker::new(Path::new("/nonexistent/path/12345"), WalkerConfig::default());

        let results: Vec<_> = walker.walk().collect();

        assert!(results.iter().all(Result::is_err));
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_skips_symlinks_by_default() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path().join("file1.txt"), dir.path().join("link.txt")).unwrap();
        symlink(dir.path().join("missing.txt"), dir.path().join("dangling.txt")).unwrap();

        let walker = Walker::new(dir.path(), WalkerConfig::default());
        let results: Vec<_> = walker.walk().collect();

        assert!(results.iter().all(Result::is_ok));
        let files: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
        let names = names(&files);
        assert!(!names.contains(&"link.txt".to_string()));
        assert!(!names.contains(&"dangling.txt".to_string()));
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_follows_symlinks_when_enabled() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path().join("file1.txt"), dir.path().join("link.txt")).unwrap();

        let config = WalkerConfig {
            follow_symlinks: true,
            ..Default::default()
        };
        let walker = Walker::new(dir.path(), config);
        let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();

        assert!(names(&files).contains(&"link.txt".to_string()));
    }

    #[test]
    #[cfg(unix)]
    fn test_walker_reports_symlink_loop() {
        use std::os::unix::fs::symlink;

        let dir = create_test_dir();
        symlink(dir.path(), dir.path().join("subdir").join("back")).unwrap();

        let config = WalkerConfig {
            follow_symlinks: true,
            ..Default::default()
        };
        let walker = Walker::new(dir.path(), config);
        let results: Vec<_> = walker.walk().collect();

        assert!(results
            .iter()
            .any(|r| matches!(r, Err(ScanError::SymlinkLoop(_)))));
        // The real files are still found exactly once
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    }
}
