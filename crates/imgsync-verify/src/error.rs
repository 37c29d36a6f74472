use std::io;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("invalid checksum format: {0}")]
    InvalidFormat(String),

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl VerifyError {
    /// True when the content was read completely but hashed to something else.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
