use std::collections::HashMap;

use imgsync_cache::sanitize_name;
use imgsync_decompress::Compression;
use imgsync_verify::{Algorithm, Checksum};

use crate::duration::parse_duration;
use crate::model::{Artifact, Hook, MANIFEST_KIND, Manifest, SUPPORTED_API_VERSION};
use crate::{ManifestError, Result};

impl Manifest {
    pub fn validate(&self) -> Result<()> {
        let issues = self.validate_all();
        if issues.is_empty() { Ok(()) } else { Err(ManifestError::Invalid(issues)) }
    }

    /// Every problem in the manifest, each prefixed with its location.
    pub fn validate_all(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.api_version != SUPPORTED_API_VERSION {
            issues.push(format!(
                "unsupported apiVersion {:?}, expected {:?}",
                self.api_version, SUPPORTED_API_VERSION
            ));
        }
        if self.kind != MANIFEST_KIND {
            issues.push(format!("unsupported kind {:?}, expected {:?}", self.kind, MANIFEST_KIND));
        }
        if self.metadata.name.is_empty() {
            issues.push("metadata.name is required".to_string());
        }

        for (i, artifact) in self.spec.images.iter().enumerate() {
            let label = if artifact.name.is_empty() {
                format!("unnamed-{i}")
            } else {
                artifact.name.clone()
            };
            for issue in artifact.validate_all() {
                issues.push(format!("image[{i}] {label:?}: {issue}"));
            }
        }

        issues
    }
}

impl Artifact {
    pub fn validate_all(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.name.is_empty() {
            issues.push("name is required".to_string());
        }
        if self.source.url.is_empty() {
            issues.push("source.url is required".to_string());
        } else if !self.source.url.starts_with("https://") {
            issues.push("source.url must use HTTPS".to_string());
        }
        if self.source.checksum.is_empty() {
            issues.push("source.checksum is required".to_string());
        } else if let Err(e) = Checksum::parse(&self.source.checksum) {
            issues.push(format!("source.checksum: {e}"));
        }
        if self.destination.is_empty() {
            issues.push("destination is required".to_string());
        }

        if let Some(format) = &self.source.decompress {
            if let Err(e) = format.parse::<Compression>() {
                issues.push(e.to_string());
            }
            if self.expected_checksum().is_none() {
                issues.push("validation.expected is required when decompress is used".to_string());
            }
        }

        if let Some(validation) = &self.validation {
            match validation.algorithm.parse::<Algorithm>() {
                Ok(algorithm) => {
                    if let Ok(expected) = Checksum::parse(&validation.expected) {
                        if expected.algorithm() != algorithm {
                            issues.push(format!(
                                "validation.expected uses {}, but validation.algorithm is {}",
                                expected.algorithm(),
                                algorithm
                            ));
                        }
                    } else if !validation.expected.is_empty() {
                        issues.push(format!(
                            "validation.expected {:?} is not <algorithm>:<hex>",
                            validation.expected
                        ));
                    }
                }
                Err(_) => issues.push(format!(
                    "unsupported validation algorithm {:?}, must be sha256 or sha512",
                    validation.algorithm
                )),
            }
        }

        for (j, hook) in self.hooks.pre_upload.iter().enumerate() {
            for issue in hook.validate_all() {
                issues.push(format!("hooks.preUpload[{j}]: {issue}"));
            }
        }
        for (j, hook) in self.hooks.transform.iter().enumerate() {
            for issue in hook.validate_all() {
                issues.push(format!("hooks.transform[{j}]: {issue}"));
            }
        }
        for (dir, names) in self.scratch_collisions() {
            issues.push(format!(
                "hooks {} share the scratch directory {dir:?}; rename one of them",
                names.iter().map(|n| format!("{n:?}")).collect::<Vec<_>>().join(", ")
            ));
        }

        issues
    }

    /// Distinct hook names of this artifact that sanitize to the same scratch
    /// directory name, keyed by that name.
    pub fn scratch_collisions(&self) -> Vec<(String, Vec<String>)> {
        let mut by_dir: HashMap<String, Vec<String>> = HashMap::new();
        for hook in self.hooks.transform.iter().chain(&self.hooks.pre_upload) {
            let names = by_dir.entry(sanitize_name(&hook.name)).or_default();
            if !names.contains(&hook.name) {
                names.push(hook.name.clone());
            }
        }
        let mut collisions: Vec<_> = by_dir.into_iter().filter(|(_, names)| names.len() > 1).collect();
        collisions.sort();
        collisions
    }
}

impl Hook {
    pub fn validate_all(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.name.is_empty() {
            issues.push("name is required".to_string());
        }
        if self.command.is_empty() {
            issues.push("command is required".to_string());
        }
        if let Some(timeout) = &self.timeout {
            if let Err(e) = parse_duration(timeout) {
                issues.push(e.to_string());
            }
        }
        issues
    }
}
