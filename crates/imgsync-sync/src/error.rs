use std::fmt;
use std::path::PathBuf;

use imgsync_fetch::FetchError;
use imgsync_hooks::HookError;
use imgsync_manifest::IdentityError;
use imgsync_store::StoreError;
use imgsync_verify::VerifyError;

/// Pipeline step an artifact failed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Identity,
    RemoteCheck,
    Download,
    Decompress,
    Verify,
    Transform,
    PreUpload,
    Upload,
    Metadata,
    Output,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Identity => "identity",
            Stage::RemoteCheck => "remote check",
            Stage::Download => "download",
            Stage::Decompress => "decompress",
            Stage::Verify => "verify",
            Stage::Transform => "transform hooks",
            Stage::PreUpload => "pre-upload hooks",
            Stage::Upload => "upload",
            Stage::Metadata => "metadata",
            Stage::Output => "output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("compute effective identity: {0}")]
    Identity(#[source] IdentityError),

    #[error("check existing artifact: {0}")]
    RemoteCheck(#[source] StoreError),

    #[error("download: {0}")]
    Download(#[source] FetchError),

    #[error("decompress: {0}")]
    Decompress(#[source] imgsync_decompress::Error),

    #[error("decompressed checksum verification: {0}")]
    Verify(#[source] VerifyError),

    #[error("transform hooks: {0}")]
    Transform(#[source] HookError),

    #[error("pre-upload hooks: {0}")]
    PreUpload(#[source] HookError),

    #[error("upload: {0}")]
    Upload(#[source] StoreError),

    #[error("write metadata: {0}")]
    Metadata(#[source] StoreError),

    #[error("write output '{path}': {source}")]
    Output {
        path:   PathBuf,
        source: imgsync_fs::Error,
    },

    #[error("background task failed during {stage}: {source}")]
    Task {
        stage:  Stage,
        source: tokio::task::JoinError,
    },

    #[error("sync artifact '{name}': {source}")]
    Artifact {
        name:   String,
        source: Box<SyncError>,
    },
}

impl SyncError {
    pub fn stage(&self) -> Stage {
        match self {
            SyncError::Identity(_) => Stage::Identity,
            SyncError::RemoteCheck(_) => Stage::RemoteCheck,
            SyncError::Download(_) => Stage::Download,
            SyncError::Decompress(_) => Stage::Decompress,
            SyncError::Verify(_) => Stage::Verify,
            SyncError::Transform(_) => Stage::Transform,
            SyncError::PreUpload(_) => Stage::PreUpload,
            SyncError::Upload(_) => Stage::Upload,
            SyncError::Metadata(_) => Stage::Metadata,
            SyncError::Output { .. } => Stage::Output,
            SyncError::Task { stage, .. } => *stage,
            SyncError::Artifact { source, .. } => source.stage(),
        }
    }

    /// The hook at fault, for hook-stage failures.
    pub fn hook_name(&self) -> Option<&str> {
        match self {
            SyncError::Transform(e) | SyncError::PreUpload(e) => e.hook_name(),
            SyncError::Artifact { source, .. } => source.hook_name(),
            _ => None,
        }
    }

    /// Name of the artifact, when the error has been attributed to one.
    pub fn artifact(&self) -> Option<&str> {
        match self {
            SyncError::Artifact { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_checksum_mismatch(&self) -> bool {
        match self {
            SyncError::Download(e) => e.is_checksum_mismatch(),
            SyncError::Verify(e) => e.is_mismatch(),
            SyncError::Artifact { source, .. } => source.is_checksum_mismatch(),
            _ => false,
        }
    }

    pub(crate) fn in_artifact(self, name: &str) -> Self {
        SyncError::Artifact {
            name:   name.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
