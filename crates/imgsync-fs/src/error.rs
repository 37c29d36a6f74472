use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create temporary file in '{dir}': {source}")]
    TempFile { dir: PathBuf, source: io::Error },

    #[error("failed to move temporary file into '{path}': {source}")]
    Persist { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
