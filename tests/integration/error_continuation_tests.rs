use similar_files::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use similar_files::scanner::{FileEntry, HashError, ScanError};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100);
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100);

    let (groups, summary) = finder
        .find_duplicates_from_files(vec![file1, file2])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.scan_errors.len(), 2);

    for err in &summary.scan_errors {
        match err {
            ScanError::Hash(HashError::NotFound(_)) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
}

#[test]
fn test_find_duplicates_from_files_strict_fails() {
    let config = FinderConfig::default().with_strict(true);
    let finder = DuplicateFinder::new(config);
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100);
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100);

    let result = finder.find_duplicates_from_files(vec![file1, file2]);

    match result {
        Err(FinderError::Scan(ScanError::Hash(HashError::NotFound(path)))) => {
            assert_eq!(path, PathBuf::from("nonexistent_1.txt"));
        }
        other => panic!("Expected NotFound ScanError, got: {:?}", other),
    }
}

#[test]
fn test_file_removed_between_phases_is_skipped() {
    let dir = tempdir().unwrap();
    let keep1 = dir.path().join("keep1");
    let keep2 = dir.path().join("keep2");
    let doomed = dir.path().join("doomed");
    for p in [&keep1, &keep2, &doomed] {
        fs::write(p, b"same").unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let (size_groups, _) = finder.partition_by_size(dir.path()).unwrap();
    let files: Vec<FileEntry> = size_groups.into_iter().flat_map(|g| g.files).collect();
    assert_eq!(files.len(), 3);

    fs::remove_file(&doomed).unwrap();

    let (groups, summary) = finder.find_duplicates_from_files(files).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths(), vec![keep1, keep2]);
    assert_eq!(summary.scan_errors.len(), 1);
    assert_eq!(summary.scan_errors[0].path(), doomed.as_path());
}

#[test]
fn test_only_survivor_of_group_is_dropped() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::write(&a, b"pair").unwrap();
    fs::write(&b, b"pair").unwrap();

    let files = vec![
        FileEntry::new(a.clone(), 4),
        FileEntry::new(b.clone(), 4),
    ];
    fs::remove_file(&b).unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_from_files(files)
        .unwrap();

    assert!(groups.is_empty());
    assert!(summary.has_errors());
}
