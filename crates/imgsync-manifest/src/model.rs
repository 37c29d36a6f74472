use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;
use crate::{ManifestError, Result};

pub const SUPPORTED_API_VERSION: &str = "imgsync.dev/v1alpha1";
pub const MANIFEST_KIND: &str = "ImageManifest";

/// Applied when a hook declares no `timeout`.
pub const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub api_version: String,
    pub kind:        String,
    pub metadata:    Metadata,
    pub spec:        Spec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    #[serde(default)]
    pub images: Vec<Artifact>,
}

/// A single artifact to mirror: where it comes from, how it is checked and
/// transformed, and where it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name:        String,
    pub source:      Source,
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation:  Option<Validation>,
    #[serde(default, skip_serializing_if = "Hooks::is_empty")]
    pub hooks:       Hooks,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url:        String,
    pub checksum:   String,
    /// One of `xz`, `gzip`, `zstd`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decompress: Option<String>,
}

/// Checksum of the artifact after decompression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub algorithm: String,
    pub expected:  String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hooks {
    /// Gate hooks; each must exit 0 for the upload to proceed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_upload: Vec<Hook>,
    /// Hooks that rewrite a working copy of the artifact in place, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transform:  Vec<Hook>,
}

impl Hooks {
    pub fn is_empty(&self) -> bool { self.pre_upload.is_empty() && self.transform.is_empty() }
}

/// An external program run against the artifact. The artifact path is always
/// the first argument, followed by `args`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    pub name:     String,
    pub command:  String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args:     Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout:  Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
    /// Globs, relative to the base directory, whose contents shape the
    /// hook's output. Only meaningful on transform hooks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs:   Vec<String>,
}

impl Hook {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name:     name.into(),
            command:  command.into(),
            args:     Vec::new(),
            timeout:  None,
            work_dir: None,
            inputs:   Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn input(mut self, pattern: impl Into<String>) -> Self {
        self.inputs.push(pattern.into());
        self
    }

    /// Declared timeout, or [`DEFAULT_HOOK_TIMEOUT`].
    pub fn timeout(&self) -> Result<Duration> {
        match &self.timeout {
            Some(t) => parse_duration(t),
            None => Ok(DEFAULT_HOOK_TIMEOUT),
        }
    }
}

impl Artifact {
    /// Checksum of the bytes that are finally uploaded, before hook inputs
    /// are considered: `validation.expected` when set, else `source.checksum`.
    pub fn base_checksum(&self) -> &str {
        match &self.validation {
            Some(v) if !v.expected.is_empty() => &v.expected,
            _ => &self.source.checksum,
        }
    }

    /// Post-decompression checksum, if one is declared.
    pub fn expected_checksum(&self) -> Option<&str> {
        self.validation
            .as_ref()
            .map(|v| v.expected.as_str())
            .filter(|e| !e.is_empty())
    }
}

impl Manifest {
    /// Read, parse and validate a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let manifest = Self::load_raw(path)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and parse without validation, to collect every issue at once.
    pub fn load_raw(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_raw(&data)
    }

    pub fn parse(data: &str) -> Result<Self> {
        let manifest = Self::parse_raw(data)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn parse_raw(data: &str) -> Result<Self> { Ok(serde_yaml::from_str(data)?) }

    pub fn find(&self, name: &str) -> Option<&Artifact> {
        self.spec.images.iter().find(|a| a.name == name)
    }

    pub fn artifacts(&self) -> &[Artifact] { &self.spec.images }
}
