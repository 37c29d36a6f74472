//! Remote object storage for synced artifacts.
//!
//! Besides the artifact bytes, the store keeps two kinds of JSON records:
//! an [`ArtifactMetadata`] beside every object, which is what makes syncing
//! idempotent, and a [`HookResult`] per pre-upload hook, which lets a passing
//! hook be skipped for an identity it has already seen.

pub use error::{Result, StoreError};
pub use fs::FsStore;
pub use key::{check_key, hook_result_key, metadata_key};
pub use memory::MemoryStore;
pub use record::{ArtifactMetadata, HookResult, SourceMetadata, format_duration};
pub use store::ObjectStore;

mod error;
mod fs;
mod key;
mod memory;
mod record;
mod store;
