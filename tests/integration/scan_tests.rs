use similar_files::duplicates::{DuplicateFinder, FinderConfig};
use similar_files::scanner::{HashAlgorithm, WalkerConfig};
use similar_files::{check_for_duplicates, get_hash};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn as_set(paths: &[PathBuf]) -> BTreeSet<PathBuf> {
    paths.iter().cloned().collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"content a");
    write_file(&dir.path().join("b.txt"), b"content b");
    write_file(&dir.path().join("c.txt"), b"content c");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 0);
    assert!(check_for_duplicates(dir.path()).unwrap().is_empty());
}

#[test]
fn test_scan_duplicate_files() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a.txt"), b"duplicate");
    write_file(&dir.path().join("b.txt"), b"duplicate");
    write_file(&dir.path().join("c.txt"), b"unique");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("one/two/three/b.txt");
    write_file(&a, b"dup");
    write_file(&b, b"dup");

    let result = check_for_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    let paths = result.values().next().unwrap();
    assert_eq!(as_set(paths), as_set(&[a, b]));
}

#[test]
fn test_scan_multiple_groups() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("1a.txt"), b"group1");
    write_file(&dir.path().join("1b.txt"), b"group1");
    write_file(&dir.path().join("1c.txt"), b"group1");
    write_file(&dir.path().join("2a.txt"), b"group2");
    write_file(&dir.path().join("2b.txt"), b"group2");

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(summary.duplicate_groups, 2);
    assert_eq!(summary.duplicate_files, 3);
    assert_eq!(summary.reclaimable_space, 18);
}

#[test]
fn test_same_size_groups_split_by_content() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a"), b"AAAA");
    write_file(&dir.path().join("b"), b"BBBB");
    write_file(&dir.path().join("c"), b"AAAA");
    write_file(&dir.path().join("d"), b"BBBB");
    write_file(&dir.path().join("e"), b"CCCC");

    let result = check_for_duplicates(dir.path()).unwrap();

    assert_eq!(result.len(), 2);
    for (hash, paths) in &result {
        assert_eq!(paths.len(), 2);
        let first = fs::read(&paths[0]).unwrap();
        assert_eq!(fs::read(&paths[1]).unwrap(), first);
        assert_eq!(*hash, get_hash(&paths[0]).unwrap());
    }
}

#[test]
fn test_every_path_in_at_most_one_group() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        let content = format!("content-{}", i % 3);
        write_file(&dir.path().join(format!("d{i}/f.txt")), content.as_bytes());
    }

    let result = check_for_duplicates(dir.path()).unwrap();

    let mut seen = BTreeSet::new();
    for paths in result.values() {
        for path in paths {
            assert!(seen.insert(path.clone()), "{} listed twice", path.display());
            assert!(path.starts_with(dir.path()));
        }
    }
    assert_eq!(seen.len(), 6);
}

#[test]
fn test_scan_skip_hidden() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("visible.txt"), b"dup");
    write_file(&dir.path().join(".hidden.txt"), b"dup");
    write_file(&dir.path().join(".git/objects/x"), b"dup");

    let all = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(all.0[0].len(), 3);

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::new(false, true)),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert!(groups.is_empty());
}

#[test]
fn test_scan_algorithms_agree_on_grouping() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a"), b"same bytes");
    write_file(&dir.path().join("b"), b"same bytes");
    write_file(&dir.path().join("c"), b"other byte");

    for algorithm in HashAlgorithm::ALL {
        let finder = DuplicateFinder::new(FinderConfig::default().with_algorithm(algorithm));
        let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 1, "{algorithm}");
        assert_eq!(groups[0].fingerprint.as_str().len(), algorithm.hex_len());
    }
}

#[test]
fn test_scan_large_files_cross_chunk_boundaries() {
    let dir = tempdir().unwrap();
    let big: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let mut tweaked = big.clone();
    tweaked[150_000] ^= 0xff;

    write_file(&dir.path().join("big1.bin"), &big);
    write_file(&dir.path().join("big2.bin"), &big);
    write_file(&dir.path().join("big3.bin"), &tweaked);

    let finder = DuplicateFinder::new(FinderConfig::default().with_chunk_size(1000));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.bytes_hashed, 600_000);
}

#[test]
fn test_scan_with_single_thread() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        write_file(&dir.path().join(format!("f{i:02}")), format!("{}", i % 4).as_bytes());
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(1));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 4);
    assert!(groups.iter().all(|g| g.len() == 5));
    assert_eq!(summary.duplicate_files, 16);
}

#[cfg(unix)]
#[test]
fn test_scan_follow_symlinks_groups_link_with_target() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("data/original.txt");
    write_file(&target, b"linked content");
    std::os::unix::fs::symlink(&target, dir.path().join("link.txt")).unwrap();

    assert!(check_for_duplicates(dir.path()).unwrap().is_empty());

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::new(true, false)),
    );
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}
