//! Bounded streaming decompression.
//!
//! Downloaded artifacts may declare a codec (`gzip`, `xz`, `zstd`). Decoding
//! streams into a fresh temporary file and is capped by an absolute output
//! ceiling, so a tiny input that expands without bound fails with
//! [`Error::LimitExceeded`] instead of filling the disk.

pub use codecs::wrap_reader;
pub use error::{Error, Result};
pub use format::Compression;
pub use guard::{
    DEFAULT_MAX_OUTPUT_BYTES, DecompressOptions, Decompressed, decompress, decompress_named,
};

mod codecs;
mod error;
mod format;
mod guard;
