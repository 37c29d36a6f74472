use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use imgsync_manifest::Manifest;

use super::DEFAULT_MANIFEST;

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Path to the artifact manifest
    #[arg(long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,
}

pub fn run(args: &ValidateArgs) -> Result<()> {
    let manifest = Manifest::load_raw(&args.manifest)
        .with_context(|| format!("load manifest '{}'", args.manifest.display()))?;

    let issues = manifest.validate_all();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  - {issue}");
        }
        bail!("manifest '{}' has {} problem(s)", args.manifest.display(), issues.len());
    }

    println!(
        "manifest '{}' is valid: {} artifact(s)",
        args.manifest.display(),
        manifest.artifacts().len()
    );
    Ok(())
}
