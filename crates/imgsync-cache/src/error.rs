use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache directory cannot be empty")]
    EmptyRoot,

    #[error("failed to create cache directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to remove cache entry '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to write cache entry: {0}")]
    Write(#[from] imgsync_fs::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;
