use imgsync_verify::Sha256Hasher;

const KEY_LEN: usize = 12;

/// Derive the on-disk key for a declared checksum.
///
/// The algorithm prefix (`sha256:`) is dropped, the remainder is hashed with
/// SHA-256 and the first 12 hex characters are kept.
pub fn checksum_key(checksum: &str) -> String {
    let digest = match checksum.split_once(':') {
        Some((_, rest)) => rest,
        None => checksum,
    };
    let mut key = hex::encode(Sha256Hasher::digest(digest.as_bytes()));
    key.truncate(KEY_LEN);
    key
}

/// Make a hook name safe for use as a single directory name.
///
/// Every byte outside `[A-Za-z0-9_-]` becomes `_`, so distinct names may
/// collide (`a/b` and `a:b` both map to `a_b`).
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_algorithm_prefix() {
        assert_eq!(checksum_key("sha256:abc123"), checksum_key("abc123"));
        assert_eq!(checksum_key("sha512:abc123"), checksum_key("sha256:abc123"));
    }

    #[test]
    fn key_is_fixed_length_hex() {
        let key = checksum_key("sha256:deadbeef");
        assert_eq!(key.len(), 12);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn distinct_checksums_get_distinct_keys() {
        assert_ne!(checksum_key("sha256:aaaa"), checksum_key("sha256:aaab"));
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_name("vyos-integration_test"), "vyos-integration_test");
        assert_eq!(sanitize_name("my hook/v1.2"), "my_hook_v1_2");
        assert_eq!(sanitize_name("a/b"), sanitize_name("a:b"));
    }

    #[test]
    fn sanitize_replaces_non_ascii() {
        assert_eq!(sanitize_name("tëst"), "t_st");
    }
}
