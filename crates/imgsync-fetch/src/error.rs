use std::path::PathBuf;

use imgsync_verify::VerifyError;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("failed to write download to '{path}': {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("checksum verification failed for {url}: {source}")]
    Verify { url: String, source: VerifyError },

    #[error(transparent)]
    Fs(#[from] imgsync_fs::Error),
}

impl FetchError {
    pub fn is_checksum_mismatch(&self) -> bool {
        matches!(self, FetchError::Verify { source, .. } if source.is_mismatch())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
