use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse manifest YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid manifest: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("invalid timeout '{value}': {reason}")]
    InvalidTimeout { value: String, reason: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source:  glob::PatternError,
    },

    #[error("failed to read hook input '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, ManifestError>;
