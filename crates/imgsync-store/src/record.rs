use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Written beside each uploaded object, after the upload completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub name:        String,
    /// Effective identity of the uploaded bytes.
    pub checksum:    String,
    pub size:        u64,
    pub uploaded_at: DateTime<Utc>,
    pub source:      SourceMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub url:  String,
}

impl SourceMetadata {
    pub fn http(url: impl Into<String>) -> Self {
        Self {
            kind: "http".to_string(),
            url:  url.into(),
        }
    }
}

/// Verdict of one pre-upload hook run against one artifact identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookResult {
    pub hook_name:   String,
    /// Identity the hook was run against.
    pub checksum:    String,
    pub passed:      bool,
    pub executed_at: DateTime<Utc>,
    pub duration:    String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output:      String,
}

impl HookResult {
    /// Whether this verdict lets the hook be skipped for `identity`.
    pub fn covers(&self, identity: &str) -> bool { self.passed && self.checksum == identity }
}

/// Render a duration as e.g. `1m30.250s` or `850ms`.
pub fn format_duration(d: Duration) -> String {
    let total_ms = d.as_millis();
    if total_ms < 1000 {
        return format!("{total_ms}ms");
    }
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let seconds = (total_ms % 60_000) as f64 / 1000.0;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&format!("{seconds}s"));
    out
}
