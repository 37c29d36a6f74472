use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::{NamedTempFile, TempPath};

use crate::{Error, Result};

const PREFIX: &str = "imgsync-";

/// Create a disposable file in the system temp directory.
///
/// The file is deleted when the returned handle is dropped.
pub fn temp_file(purpose: &str) -> Result<NamedTempFile> {
    temp_file_in(&std::env::temp_dir(), purpose)
}

pub fn temp_file_in(dir: &Path, purpose: &str) -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(&format!("{PREFIX}{purpose}-"))
        .tempfile_in(dir)
        .map_err(|e| Error::TempFile {
            dir: dir.to_path_buf(),
            source: e,
        })
}

/// Copy `src` into a fresh temporary file owned by the caller.
///
/// The handle is closed before returning so external programs may rewrite
/// the file by path; the file itself is removed when the [`TempPath`] drops.
pub fn working_copy(src: &Path, purpose: &str) -> Result<TempPath> {
    let mut input = File::open(src).map_err(|e| Error::Read {
        path: src.to_path_buf(),
        source: e,
    })?;
    let mut tmp = temp_file(purpose)?;
    io::copy(&mut input, tmp.as_file_mut()).map_err(|e| Error::Write {
        path: tmp.path().to_path_buf(),
        source: e,
    })?;
    Ok(tmp.into_temp_path())
}

/// Path that is either borrowed from elsewhere or owned and disposable.
///
/// Pipelines hand files between stages without caring whether the current
/// file is a cache entry (must survive) or a scratch file (must be removed).
#[derive(Debug)]
pub enum StagedFile {
    Kept(PathBuf),
    Disposable(TempPath),
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        match self {
            StagedFile::Kept(p) => p.as_path(),
            StagedFile::Disposable(p) => &**p,
        }
    }
}

impl From<NamedTempFile> for StagedFile {
    fn from(file: NamedTempFile) -> Self { StagedFile::Disposable(file.into_temp_path()) }
}

impl From<TempPath> for StagedFile {
    fn from(path: TempPath) -> Self { StagedFile::Disposable(path) }
}
