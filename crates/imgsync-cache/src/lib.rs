//! Content-addressed local cache for downloaded artifacts.
//!
//! The cache only accelerates; it is never a source of truth. Entries are
//! keyed by the declared source checksum and must be re-verified by the
//! caller before use. A second namespace hands each hook a private scratch
//! directory that the cache never inspects.

pub use cache::LocalCache;
pub use error::{CacheError, Result};
pub use key::{checksum_key, sanitize_name};

mod cache;
mod error;
mod key;
