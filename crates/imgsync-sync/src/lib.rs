//! Artifact sync orchestration.
//!
//! For each manifest artifact the [`Syncer`] computes the effective
//! identity, asks the store whether it is already published, and only then
//! acquires the source (cache or download), verifies it, decompresses it,
//! runs transform and pre-upload hooks, uploads it and writes its metadata.
//! An artifact whose identity is already published costs one store lookup.

pub use error::{Result, Stage, SyncError};
pub use options::SyncOptions;
pub use report::{DownloadResult, Outcome, SyncReport, SyncSummary};
pub use syncer::{State, Syncer};

mod error;
mod options;
mod report;
mod syncer;
