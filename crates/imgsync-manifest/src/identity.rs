use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use imgsync_verify::{Hasher, Sha256Hasher};

use crate::IdentityError;
use crate::model::Artifact;

/// Separates the base checksum from the hook-input digest in an identity.
pub const INPUTS_MARKER: &str = "+inputs:";

impl Artifact {
    /// Every distinct input glob declared by this artifact's transform hooks,
    /// in declaration order.
    pub fn input_patterns(&self) -> Vec<&str> {
        let mut patterns: Vec<&str> = Vec::new();
        for pattern in self.hooks.transform.iter().flat_map(|h| &h.inputs) {
            if !patterns.contains(&pattern.as_str()) {
                patterns.push(pattern);
            }
        }
        patterns
    }

    /// The idempotency key for this artifact.
    ///
    /// Without transform inputs this is [`Artifact::base_checksum`] and no
    /// file is touched. Otherwise the inputs resolved under `base_dir` are
    /// hashed and appended as `+inputs:<hex>`.
    pub fn effective_identity(&self, base_dir: &Path) -> Result<String, IdentityError> {
        let base = self.base_checksum();
        let patterns = self.input_patterns();
        if patterns.is_empty() {
            return Ok(base.to_string());
        }
        let digest = hash_input_files(base_dir, &patterns)?;
        Ok(format!("{base}{INPUTS_MARKER}{digest}"))
    }
}

/// SHA-256 over every regular file matched by `patterns` under `base_dir`.
///
/// Files are ordered by relative path and each contributes
/// `path \0 content \0`, so the digest is independent of match order and of
/// where `base_dir` lives.
pub fn hash_input_files(base_dir: &Path, patterns: &[&str]) -> Result<String, IdentityError> {
    let files = resolve_inputs(base_dir, patterns)?;

    let mut hasher = Sha256Hasher::new();
    let mut buf = vec![0u8; 64 * 1024];
    for (rel, path) in &files {
        hasher.update(rel.as_bytes());
        hasher.update(&[0]);
        let mut file = File::open(path).map_err(|source| read_error(path, source))?;
        loop {
            let n = file.read(&mut buf).map_err(|source| read_error(path, source))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        hasher.update(&[0]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Matched regular files keyed by their `/`-joined path relative to `base_dir`.
pub fn resolve_inputs(
    base_dir: &Path,
    patterns: &[&str],
) -> Result<BTreeMap<String, PathBuf>, IdentityError> {
    let base_dir = if base_dir.as_os_str().is_empty() { Path::new(".") } else { base_dir };
    let prefix = glob::Pattern::escape(&base_dir.to_string_lossy());
    let mut files = BTreeMap::new();

    for pattern in patterns {
        let full = format!("{}/{}", prefix.trim_end_matches('/'), pattern);
        let entries = glob::glob(&full).map_err(|source| IdentityError::Pattern {
            pattern: (*pattern).to_string(),
            source,
        })?;
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                read_error(&path, e.into())
            })?;
            let meta = std::fs::metadata(&path).map_err(|source| read_error(&path, source))?;
            if !meta.is_file() {
                continue;
            }
            let rel = relative_key(base_dir, &path);
            files.entry(rel).or_insert(path);
        }
    }

    Ok(files)
}

fn relative_key(base_dir: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base_dir).unwrap_or(path);
    let mut parts: Vec<String> = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => match parts.last() {
                Some(last) if last != ".." => {
                    parts.pop();
                }
                _ => parts.push("..".to_string()),
            },
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts.join("/")
}

fn read_error(path: &Path, source: std::io::Error) -> IdentityError {
    IdentityError::Read {
        path: path.to_path_buf(),
        source,
    }
}
