use imgsync_cache::{CacheError, LocalCache};
use tempfile::TempDir;

#[test]
fn put_then_get_round_trip() {
    let tmp = TempDir::new().unwrap();
    let cache = LocalCache::open(tmp.path()).unwrap();
    let data = b"test image content";

    let put_path = cache.put("sha256:abc123", &mut &data[..]).unwrap();
    let got = cache.get("sha256:abc123").expect("entry present");

    assert_eq!(put_path, got);
    assert_eq!(std::fs::read(&got).unwrap(), data);
}

#[test]
fn put_overwrites_existing_entry() {
    let tmp = TempDir::new().unwrap();
    let cache = LocalCache::open(tmp.path()).unwrap();

    cache.put("sha256:abc", &mut &b"stale"[..]).unwrap();
    let path = cache.put("sha256:abc", &mut &b"fresh"[..]).unwrap();

    assert_eq!(std::fs::read(path).unwrap(), b"fresh");
}

#[test]
fn remove_then_get_is_absent() {
    let tmp = TempDir::new().unwrap();
    let cache = LocalCache::open(tmp.path()).unwrap();

    cache.put("sha256:abc123", &mut &b"data"[..]).unwrap();
    cache.remove("sha256:abc123").unwrap();

    assert!(cache.get("sha256:abc123").is_none());
}

#[test]
fn remove_missing_entry_fails() {
    let tmp = TempDir::new().unwrap();
    let cache = LocalCache::open(tmp.path()).unwrap();

    let err = cache.remove("sha256:never-stored").unwrap_err();
    assert!(matches!(err, CacheError::Remove { .. }));
}

#[test]
fn hook_dir_is_sanitized_and_created() {
    let tmp = TempDir::new().unwrap();
    let cache = LocalCache::open(tmp.path()).unwrap();

    let dir = cache.hook_dir("integration test/vyos").unwrap();

    assert_eq!(dir, tmp.path().join("hooks").join("integration_test_vyos"));
    assert!(dir.is_dir());
}

#[test]
fn hook_dir_is_stable_across_calls() {
    let tmp = TempDir::new().unwrap();
    let cache = LocalCache::open(tmp.path()).unwrap();

    let first = cache.hook_dir("build").unwrap();
    std::fs::write(first.join("state"), b"kept").unwrap();
    let second = cache.hook_dir("build").unwrap();

    assert_eq!(first, second);
    assert_eq!(std::fs::read(second.join("state")).unwrap(), b"kept");
}
