//! Filesystem primitives for staging artifacts.
//!
//! - [`atomic_copy`] / [`atomic_write`]: write-then-rename placement
//! - [`temp_file`] / [`working_copy`]: disposable files removed on drop
//! - [`StagedFile`]: a pipeline's current file, owned or borrowed

pub use atomic::{atomic_copy, atomic_copy_file, atomic_write};
pub use error::{Error, Result};
pub use temp::{StagedFile, temp_file, temp_file_in, working_copy};

pub use tempfile::{NamedTempFile, TempPath};

mod atomic;
mod error;
mod temp;
