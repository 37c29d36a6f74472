use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The step output file, when running under GitHub Actions.
pub fn output_path() -> Option<PathBuf> {
    std::env::var_os("GITHUB_OUTPUT")
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

pub fn append_output(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("open GITHUB_OUTPUT '{}'", path.display()))?;
    writeln!(file, "{name}={value}").with_context(|| format!("write GITHUB_OUTPUT '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_key_value_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        append_output(&path, "files_changed", "true").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing=1\nfiles_changed=true\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(append_output(&dir.path().join("absent"), "k", "v").is_err());
    }
}
