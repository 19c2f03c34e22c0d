use dupecount::duplicates::{DuplicateIndexer, IndexError, IndexerConfig, Strategy};
use dupecount::report::{AggregateError, ReportAggregator};
use dupecount::scanner::{DigestAlgorithm, FileOperation, Hasher, Walker, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn scan(root: &Path, strategy: Strategy) -> dupecount::duplicates::DuplicateMapping {
    let paths = Walker::new(root, WalkerConfig::default()).collect_paths();
    DuplicateIndexer::new(IndexerConfig::default().with_strategy(strategy))
        .index(paths)
        .unwrap()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    for strategy in [Strategy::Direct, Strategy::Hashed] {
        let mapping = scan(dir.path(), strategy);
        assert!(mapping.is_empty());

        let result = ReportAggregator::new().aggregate(&mapping);
        assert!(matches!(result, Err(AggregateError::NoDuplicatesFound)));
    }
}

#[test]
fn test_scan_abcd_on_disk() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("A"), b"hello");
    write(&dir.path().join("B"), b"world");
    write(&dir.path().join("C"), b"hello");
    write(&dir.path().join("D"), b"hello");

    let a = dir.path().join("A");
    let c = dir.path().join("C");
    let d = dir.path().join("D");

    for strategy in [Strategy::Direct, Strategy::Hashed] {
        let mapping = scan(dir.path(), strategy);

        assert_eq!(mapping.len(), 4);
        assert_eq!(mapping.get(&a).unwrap(), &[c.clone(), d.clone()]);
        assert!(mapping.get(&dir.path().join("B")).unwrap().is_empty());
        assert_eq!(mapping.get(&c).unwrap(), &[d.clone()]);
        assert!(mapping.get(&d).unwrap().is_empty());

        let report = ReportAggregator::new().aggregate(&mapping).unwrap();
        assert_eq!(report.most_duplicated.representative, a);
        assert_eq!(report.most_duplicated.duplicate_count, 2);
        assert_eq!(report.most_reclaimable.representative, a);
        assert_eq!(report.most_reclaimable.reclaimable_bytes, 10);
    }
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content b");
    write(&dir.path().join("c.txt"), b"content c");

    let mapping = scan(dir.path(), Strategy::Hashed);
    assert_eq!(mapping.len(), 3);
    assert!(!mapping.has_duplicates());

    let report = ReportAggregator::new().aggregate(&mapping).unwrap();
    assert_eq!(report.most_duplicated.duplicate_count, 0);
    assert_eq!(report.most_reclaimable.duplicate_count, 0);
    assert_eq!(
        report.most_duplicated.representative,
        dir.path().join("a.txt")
    );
}

#[test]
fn test_scan_nested_duplicates() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    let deeper = sub.join("deeper");
    fs::create_dir_all(&deeper).unwrap();

    write(&dir.path().join("top.txt"), b"shared");
    write(&sub.join("middle.txt"), b"shared");
    write(&deeper.join("bottom.txt"), b"shared");
    write(&deeper.join("other.txt"), b"different");

    let direct = scan(dir.path(), Strategy::Direct);
    let hashed = scan(dir.path(), Strategy::Hashed);

    assert_eq!(direct, hashed);
    let groups = direct.groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths().len(), 3);
}

#[test]
fn test_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1.txt")).unwrap();
    File::create(dir.path().join("empty2.txt")).unwrap();

    let mapping = scan(dir.path(), Strategy::Hashed);
    assert_eq!(
        mapping.get(&dir.path().join("empty1.txt")).unwrap(),
        &[dir.path().join("empty2.txt")]
    );

    // Nothing to reclaim, so the first key wins the space ranking
    let report = ReportAggregator::new().aggregate(&mapping).unwrap();
    assert_eq!(report.most_reclaimable.reclaimable_bytes, 0);
    assert_eq!(report.most_duplicated.duplicate_count, 1);
}

#[test]
fn test_same_size_different_content() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.bin"), b"aaaa");
    write(&dir.path().join("b.bin"), b"aaab");

    for strategy in [Strategy::Direct, Strategy::Hashed] {
        assert!(!scan(dir.path(), strategy).has_duplicates());
    }
}

#[test]
fn test_last_file_in_tree_is_found() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("aaa.txt"), b"payload");
    write(&dir.path().join("mmm.txt"), b"filler");
    write(&dir.path().join("zzz.txt"), b"payload");

    for strategy in [Strategy::Direct, Strategy::Hashed] {
        let mapping = scan(dir.path(), strategy);
        assert_eq!(
            mapping.get(&dir.path().join("aaa.txt")).unwrap(),
            &[dir.path().join("zzz.txt")]
        );
    }
}

#[test]
fn test_sha256_and_paranoid_agree_with_direct() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        let content = format!("content {}", i % 3);
        write(&dir.path().join(format!("f{i}.txt")), content.as_bytes());
    }
    let paths = Walker::new(dir.path(), WalkerConfig::default()).collect_paths();

    let direct = DuplicateIndexer::new(IndexerConfig::default().with_strategy(Strategy::Direct))
        .index(paths.clone())
        .unwrap();
    let sha = DuplicateIndexer::new(IndexerConfig::default().with_paranoid(true))
        .with_hasher(Arc::new(
            Hasher::new().with_algorithm(DigestAlgorithm::Sha256),
        ))
        .index(paths)
        .unwrap();

    assert_eq!(direct, sha);
    assert_eq!(direct.groups().len(), 3);
}

#[test]
fn test_file_deleted_after_enumeration() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"same");
    write(&dir.path().join("b.txt"), b"same");
    write(&dir.path().join("c.txt"), b"same");

    let paths = Walker::new(dir.path(), WalkerConfig::default()).collect_paths();
    let victim = dir.path().join("b.txt");
    fs::remove_file(&victim).unwrap();

    for (strategy, operation) in [
        (Strategy::Direct, FileOperation::Compare),
        (Strategy::Hashed, FileOperation::Hash),
    ] {
        let err = DuplicateIndexer::new(IndexerConfig::default().with_strategy(strategy))
            .index(paths.clone())
            .unwrap_err();

        match err {
            IndexError::FileAccess(e) => {
                assert_eq!(e.path, victim);
                assert_eq!(e.operation, operation);
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn test_file_deleted_before_report() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"same");
    write(&dir.path().join("b.txt"), b"same");

    let mapping = scan(dir.path(), Strategy::Hashed);
    fs::remove_file(dir.path().join("a.txt")).unwrap();

    match ReportAggregator::new().aggregate(&mapping) {
        Err(AggregateError::FileAccess(e)) => {
            assert_eq!(e.path, dir.path().join("a.txt"));
            assert_eq!(e.operation, FileOperation::Size);
        }
        other => panic!("expected size failure, got {other:?}"),
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("x"), b"1");
    write(&dir.path().join("y"), b"1");
    write(&dir.path().join("z"), b"2");

    let first = scan(dir.path(), Strategy::Hashed);
    let second = scan(dir.path(), Strategy::Hashed);
    assert_eq!(first, second);
}

#[test]
fn test_ignore_patterns_exclude_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("keep1.txt"), b"dup");
    write(&dir.path().join("keep2.txt"), b"dup");
    write(&dir.path().join("skip.tmp"), b"dup");

    let config = WalkerConfig {
        ignore_patterns: vec!["*.tmp".to_string()],
        ..Default::default()
    };
    let paths: Vec<PathBuf> = Walker::new(dir.path(), config).collect_paths();
    let mapping = DuplicateIndexer::with_defaults().index(paths).unwrap();

    assert_eq!(mapping.len(), 2);
    assert!(!mapping.contains_key(&dir.path().join("skip.tmp")));
}

#[test]
fn test_gitignore_in_root_does_not_hide_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join(".gitignore"), b"*.bin\n");
    write(&dir.path().join("a.bin"), b"payload");
    write(&dir.path().join("b.bin"), b"payload");

    let paths = Walker::new(dir.path(), WalkerConfig::default()).collect_paths();
    assert_eq!(paths.len(), 3);

    let mapping = scan(dir.path(), Strategy::Hashed);
    assert_eq!(mapping.groups().len(), 1);
    assert_eq!(
        mapping.get(&dir.path().join("a.bin")).unwrap(),
        [dir.path().join("b.bin")]
    );
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_names_path() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked.txt");
    write(&dir.path().join("open.txt"), b"data");
    write(&locked, b"data");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to test then
    if File::open(&locked).is_ok() {
        return;
    }

    let paths = Walker::new(dir.path(), WalkerConfig::default()).collect_paths();
    let err = DuplicateIndexer::with_defaults().index(paths).unwrap_err();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    match err {
        IndexError::FileAccess(e) => assert_eq!(e.path, locked),
        other => panic!("unexpected error: {other}"),
    }
}
