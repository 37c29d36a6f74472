use std::fs;
use std::path::Path;

use imgsync_manifest::{Artifact, Hook, Hooks, IdentityError, Source, hash_input_files};

const BASE: &str = "sha256:1111111111111111111111111111111111111111111111111111111111111111";
const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

fn artifact(transform: Vec<Hook>) -> Artifact {
    Artifact {
        name:        "debian".to_string(),
        source:      Source {
            url:        "https://example.com/debian.qcow2".to_string(),
            checksum:   BASE.to_string(),
            decompress: None,
        },
        destination: "images/debian.qcow2".to_string(),
        validation:  None,
        hooks:       Hooks {
            pre_upload: Vec::new(),
            transform,
        },
    }
}

fn write(dir: &Path, rel: &str, data: &[u8]) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

#[test]
fn no_inputs_is_base_checksum() {
    let a = artifact(vec![Hook::new("inject", "./inject.sh")]);
    let id = a.effective_identity(Path::new("/nonexistent/dir")).unwrap();
    assert_eq!(id, BASE);
}

#[test]
fn validation_checksum_takes_precedence() {
    let mut a = artifact(Vec::new());
    a.validation = Some(imgsync_manifest::Validation {
        algorithm: "sha256".to_string(),
        expected:  "sha256:2222".to_string(),
    });
    assert_eq!(a.effective_identity(Path::new(".")).unwrap(), "sha256:2222");
}

#[test]
fn inputs_append_suffix() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "scripts/inject.sh", b"#!/bin/sh\necho hi\n");

    let a = artifact(vec![Hook::new("inject", "./inject.sh").input("scripts/*.sh")]);
    let id = a.effective_identity(dir.path()).unwrap();

    let (base, digest) = id.split_once("+inputs:").unwrap();
    assert_eq!(base, BASE);
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn identical_inputs_in_different_places_match() {
    let one = tempfile::tempdir().unwrap();
    let two = tempfile::tempdir().unwrap();
    for dir in [one.path(), two.path()] {
        write(dir, "a.txt", b"alpha");
        write(dir, "nested/b.txt", b"beta");
    }

    let a = artifact(vec![Hook::new("t", "true").input("*.txt").input("nested/*.txt")]);
    assert_eq!(
        a.effective_identity(one.path()).unwrap(),
        a.effective_identity(two.path()).unwrap()
    );
}

#[test]
fn pattern_order_and_overlap_do_not_matter() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"alpha");
    write(dir.path(), "b.txt", b"beta");

    let forward = hash_input_files(dir.path(), &["a.txt", "b.txt"]).unwrap();
    let reverse = hash_input_files(dir.path(), &["b.txt", "a.txt"]).unwrap();
    let overlapping = hash_input_files(dir.path(), &["*.txt", "a.txt"]).unwrap();
    assert_eq!(forward, reverse);
    assert_eq!(forward, overlapping);
}

#[test]
fn inputs_spread_across_hooks_are_unioned() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.txt", b"alpha");
    write(dir.path(), "b.txt", b"beta");

    let split = artifact(vec![
        Hook::new("first", "true").input("a.txt"),
        Hook::new("second", "true").input("b.txt"),
    ]);
    let joined = artifact(vec![Hook::new("only", "true").input("*.txt")]);
    assert_eq!(
        split.effective_identity(dir.path()).unwrap(),
        joined.effective_identity(dir.path()).unwrap()
    );
}

#[test]
fn one_byte_change_changes_suffix() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "config.ini", b"value=1");
    let a = artifact(vec![Hook::new("t", "true").input("config.ini")]);

    let before = a.effective_identity(dir.path()).unwrap();
    write(dir.path(), "config.ini", b"value=2");
    let after = a.effective_identity(dir.path()).unwrap();

    assert_ne!(before, after);
    assert!(after.starts_with(BASE));
}

#[test]
fn renaming_an_input_changes_suffix() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "one.txt", b"same");
    let before = hash_input_files(dir.path(), &["*.txt"]).unwrap();

    fs::rename(dir.path().join("one.txt"), dir.path().join("two.txt")).unwrap();
    let after = hash_input_files(dir.path(), &["*.txt"]).unwrap();
    assert_ne!(before, after);
}

#[test]
fn zero_matches_hash_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let a = artifact(vec![Hook::new("t", "true").input("missing/*.sh")]);
    let id = a.effective_identity(dir.path()).unwrap();
    assert_eq!(id, format!("{BASE}+inputs:{EMPTY_SHA256}"));
}

#[test]
fn directories_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "data/file.bin", b"payload");

    let with_dir = hash_input_files(dir.path(), &["data", "data/*"]).unwrap();
    let files_only = hash_input_files(dir.path(), &["data/file.bin"]).unwrap();
    assert_eq!(with_dir, files_only);
}

#[test]
fn malformed_pattern_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let a = artifact(vec![Hook::new("t", "true").input("[unclosed")]);
    let err = a.effective_identity(dir.path()).unwrap_err();
    assert!(matches!(err, IdentityError::Pattern { ref pattern, .. } if pattern == "[unclosed"));
}

#[test]
fn inputs_outside_base_dir_are_distinct() {
    let root = tempfile::tempdir().unwrap();
    let base = root.path().join("repo");
    write(&base, "x/a", b"inside");
    write(root.path(), "x/a", b"outside");

    let before = hash_input_files(&base, &["x/a", "../x/a"]).unwrap();
    write(root.path(), "x/a", b"outside, edited");
    let after = hash_input_files(&base, &["x/a", "../x/a"]).unwrap();

    assert_ne!(before, after);
}
