use std::io;
use std::time::Duration;

use imgsync_manifest::ManifestError;

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("hook '{name}' has an invalid timeout: {source}")]
    InvalidTimeout { name: String, source: ManifestError },

    #[error("failed to start hook '{name}': {source}")]
    Spawn { name: String, source: io::Error },

    #[error("hook '{name}' failed waiting for exit: {source}")]
    Wait { name: String, source: io::Error },

    #[error("hook '{name}' failed ({status}):\n{output}")]
    Failed {
        name:   String,
        status: String,
        output: String,
    },

    #[error("hook '{name}' timed out after {timeout:?}:\n{output}")]
    Timeout {
        name:    String,
        timeout: Duration,
        output:  String,
    },

    #[error("failed to create working copy: {0}")]
    WorkingCopy(#[from] imgsync_fs::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl HookError {
    /// Name of the hook that failed, when a specific hook is at fault.
    pub fn hook_name(&self) -> Option<&str> {
        match self {
            HookError::InvalidTimeout { name, .. }
            | HookError::Spawn { name, .. }
            | HookError::Wait { name, .. }
            | HookError::Failed { name, .. }
            | HookError::Timeout { name, .. } => Some(name),
            HookError::WorkingCopy(_) | HookError::Task(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool { matches!(self, HookError::Timeout { .. }) }
}

pub type Result<T> = std::result::Result<T, HookError>;
