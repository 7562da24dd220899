use std::fs;

use super::*;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

#[test]
fn finds_png_only_dirs_with_counts() {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();
    touch(&r.join("a/1.png"));
    touch(&r.join("a/2.PNG"));
    touch(&r.join("b/1.png"));
    touch(&r.join("b/readme.txt"));
    touch(&r.join("c/d/3.png"));
    fs::create_dir_all(r.join("empty")).unwrap();

    let found = find_png_only_dirs(r).unwrap();
    assert_eq!(
        found,
        vec![
            PngOnlyDir {
                path: r.join("a"),
                png_count: 2,
            },
            PngOnlyDir {
                path: r.join("c/d"),
                png_count: 1,
            },
        ]
    );
}

#[test]
fn png_scan_requires_a_directory() {
    let root = tempfile::tempdir().unwrap();
    assert!(find_png_only_dirs(&root.path().join("missing")).is_err());
}

#[test]
fn nested_empty_dirs_count_as_empty() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("x/y/z")).unwrap();
    assert!(is_effectively_empty(&root.path().join("x")));

    touch(&root.path().join("x/y/file"));
    assert!(!is_effectively_empty(&root.path().join("x")));
}

#[test]
fn prune_removes_empty_trees_and_keeps_root() {
    let root = tempfile::tempdir().unwrap();
    let r = root.path();
    fs::create_dir_all(r.join("gone/inner/deeper")).unwrap();
    touch(&r.join("kept/file.png"));
    fs::create_dir_all(r.join("kept/empty_child")).unwrap();

    let report = prune_empty_dirs(r, false).unwrap();

    assert_eq!(report.checked, 5);
    assert_eq!(
        report.removed,
        vec![
            r.join("gone/inner/deeper"),
            r.join("gone/inner"),
            r.join("gone"),
            r.join("kept/empty_child"),
        ]
    );
    assert!(report.failed.is_empty());
    assert!(r.exists());
    assert!(!r.join("gone").exists());
    assert!(r.join("kept/file.png").exists());
    assert!(!r.join("kept/empty_child").exists());
}

#[test]
fn dry_run_deletes_nothing() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("a/b")).unwrap();

    let report = prune_empty_dirs(root.path(), true).unwrap();

    assert_eq!(report.removed.len(), 2);
    assert!(root.path().join("a/b").exists());
}
