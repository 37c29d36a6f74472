use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Stream `reader` into `dest` through a sibling temporary file.
///
/// The temporary file lives in the same directory as `dest` so the final
/// rename never crosses a filesystem. Readers of `dest` observe either the
/// previous content or the complete new content. Returns the bytes written.
pub fn atomic_copy<R: Read + ?Sized>(reader: &mut R, dest: &Path) -> Result<u64> {
    let mut tmp = sibling_temp(dest)?;
    let written = io::copy(reader, tmp.as_file_mut()).map_err(|e| Error::Write {
        path: tmp.path().to_path_buf(),
        source: e,
    })?;
    tmp.as_file().sync_all().map_err(|e| Error::Write {
        path: tmp.path().to_path_buf(),
        source: e,
    })?;
    persist(tmp, dest)?;
    Ok(written)
}

/// Write `content` to `path` atomically.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let mut tmp = sibling_temp(path)?;
    tmp.write_all(content).map_err(|e| Error::Write {
        path: tmp.path().to_path_buf(),
        source: e,
    })?;
    persist(tmp, path)
}

/// Copy the file at `src` to `dest` atomically.
pub fn atomic_copy_file(src: &Path, dest: &Path) -> Result<u64> {
    let mut file = File::open(src).map_err(|e| Error::Read {
        path: src.to_path_buf(),
        source: e,
    })?;
    atomic_copy(&mut file, dest)
}

fn sibling_temp(dest: &Path) -> Result<NamedTempFile> {
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::TempFile {
            dir: parent.to_path_buf(),
            source: e,
        })
}

fn persist(tmp: NamedTempFile, dest: &Path) -> Result<()> {
    // On failure the returned NamedTempFile is dropped, removing the temp file.
    tmp.persist(dest).map_err(|e| Error::Persist {
        path: dest.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.txt");
        atomic_write(&path, b"hello world").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn test_atomic_copy_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob");
        let n = atomic_copy(&mut &b"streamed"[..], &path).unwrap();
        assert_eq!(n, 8);

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("blob")]);
    }

    #[test]
    fn test_atomic_copy_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("blob");
        let err = atomic_copy(&mut &b"x"[..], &path).unwrap_err();
        assert!(matches!(err, Error::TempFile { .. }));
    }
}
