use std::path::PathBuf;

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The store already holds this identity; nothing was done.
    UpToDate,
    /// Dry run: identity computed, nothing fetched or written.
    DryRun,
    /// Hooks ran but the upload was suppressed.
    UploadSkipped,
    Uploaded { size: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncReport {
    pub name:     String,
    pub identity: String,
    pub outcome:  Outcome,
    /// True iff the artifact was uploaded.
    pub changed:  bool,
}

impl SyncReport {
    pub(crate) fn new(name: &str, identity: String, outcome: Outcome) -> Self {
        let changed = matches!(outcome, Outcome::Uploaded { .. });
        Self {
            name: name.to_string(),
            identity,
            outcome,
            changed,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub reports: Vec<SyncReport>,
    pub changed: bool,
}

impl SyncSummary {
    pub(crate) fn push(&mut self, report: SyncReport) {
        self.changed |= report.changed;
        self.reports.push(report);
    }
}

/// What `download_artifact` delivered, printed as JSON by the CLI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    pub path:     PathBuf,
    pub checksum: String,
    pub size:     u64,
    pub name:     String,
}
