use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::key::{checksum_key, sanitize_name};
use crate::{CacheError, Result};

const DOWNLOADS: &str = "downloads";
const HOOKS: &str = "hooks";

/// Local on-disk cache rooted at a single directory.
///
/// ```text
/// <root>/downloads/<key>        verified source blobs
/// <root>/hooks/<hook-name>/     opaque per-hook scratch space
/// ```
///
/// Entries are never expired; callers re-verify an entry before trusting it.
#[derive(Clone, Debug)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    /// Open (creating if needed) a cache rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(CacheError::EmptyRoot);
        }
        for dir in [root.join(DOWNLOADS), root.join(HOOKS)] {
            create_dir(&dir)?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path { &self.root }

    fn entry_path(&self, checksum: &str) -> PathBuf {
        self.root.join(DOWNLOADS).join(checksum_key(checksum))
    }

    /// Path of the cached blob for `checksum`, if present.
    pub fn get(&self, checksum: &str) -> Option<PathBuf> {
        let path = self.entry_path(checksum);
        path.is_file().then_some(path)
    }

    /// Store the content of `reader` under `checksum`.
    ///
    /// Content is written beside the final entry and renamed into place, so a
    /// concurrent reader or a crash never exposes a partial entry.
    pub fn put<R: Read + ?Sized>(&self, checksum: &str, reader: &mut R) -> Result<PathBuf> {
        let path = self.entry_path(checksum);
        let bytes = imgsync_fs::atomic_copy(reader, &path)?;
        debug!(path = %path.display(), bytes, "cached download");
        Ok(path)
    }

    /// Delete the cached blob for `checksum`.
    pub fn remove(&self, checksum: &str) -> Result<()> {
        let path = self.entry_path(checksum);
        std::fs::remove_file(&path).map_err(|source| CacheError::Remove { path, source })
    }

    /// Scratch directory for `hook_name`, created on demand.
    pub fn hook_dir(&self, hook_name: &str) -> Result<PathBuf> {
        let dir = self.root.join(HOOKS).join(sanitize_name(hook_name));
        create_dir(&dir)?;
        Ok(dir)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| CacheError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_namespaces() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");
        LocalCache::open(&root).unwrap();

        assert!(root.join("downloads").is_dir());
        assert!(root.join("hooks").is_dir());
    }

    #[test]
    fn open_rejects_empty_root() {
        assert!(matches!(LocalCache::open(""), Err(CacheError::EmptyRoot)));
    }

    #[test]
    fn get_missing_entry() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::open(tmp.path()).unwrap();
        assert!(cache.get("sha256:nothing").is_none());
    }

    #[test]
    fn entry_lives_under_downloads() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::open(tmp.path()).unwrap();
        let path = cache.put("sha256:abc", &mut &b"x"[..]).unwrap();

        assert_eq!(path.parent().unwrap(), tmp.path().join("downloads"));
        assert_eq!(path.file_name().unwrap().len(), 12);
    }
}
