use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid object key '{0}'")]
    InvalidKey(String),

    #[error("I/O error on '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("upload of '{key}' wrote {actual} bytes, expected {expected}")]
    SizeMismatch { key: String, expected: u64, actual: u64 },

    #[error("failed to encode or decode record: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fs(#[from] imgsync_fs::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
