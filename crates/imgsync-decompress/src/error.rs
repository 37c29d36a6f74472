use std::io;

use crate::Compression;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported decompression format '{0}', must be xz, gzip, or zstd")]
    UnsupportedFormat(String),

    #[error("invalid {format} stream: {source}")]
    Codec { format: Compression, source: io::Error },

    #[error("decompressed output exceeds limit of {limit} bytes")]
    LimitExceeded { limit: u64 },

    #[error(transparent)]
    Fs(#[from] imgsync_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
