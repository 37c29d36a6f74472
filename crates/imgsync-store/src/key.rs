use crate::{Result, StoreError};

/// Key of the metadata record stored beside `destination`.
pub fn metadata_key(destination: &str) -> String { format!("{destination}.meta.json") }

/// Key of the verdict for `hook_name` run against `destination`,
/// e.g. `hooks/debian/debian-12.qcow2/boot-test.json`.
pub fn hook_result_key(destination: &str, hook_name: &str) -> String {
    format!("hooks/{destination}/{hook_name}.json")
}

/// Reject keys that could escape a store root.
pub fn check_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if bad { Err(StoreError::InvalidKey(key.to_string())) } else { Ok(()) }
}
