use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use imgsync_manifest::Manifest;

mod download;
mod sync;
mod validate;

pub const DEFAULT_MANIFEST: &str = "./images/images.yaml";

#[derive(Debug, Parser)]
#[command(name = "imgsync", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download, verify, hook and upload every artifact in a manifest
    #[command(name = "sync")]
    Sync(sync::SyncArgs),
    /// Download one artifact to a local file and print a JSON summary
    #[command(alias = "dl", name = "download")]
    Download(download::DownloadArgs),
    /// Check a manifest and report every problem found
    #[command(name = "validate")]
    Validate(validate::ValidateArgs),
}

pub async fn run(app: App) -> Result<()> {
    match app.cmd {
        Commands::Sync(args) => sync::run(args).await,
        Commands::Download(args) => download::run(args).await,
        Commands::Validate(args) => validate::run(&args),
    }
}

pub(crate) fn load_manifest(path: &Path) -> Result<Manifest> {
    Manifest::load(path).with_context(|| format!("load manifest '{}'", path.display()))
}

/// Hook inputs resolve against the parent of the manifest's directory,
/// i.e. the repository root for `<repo>/images/images.yaml`.
pub(crate) fn default_base_dir(manifest: &Path) -> Result<PathBuf> {
    let manifest = std::path::absolute(manifest)
        .with_context(|| format!("resolve manifest path '{}'", manifest.display()))?;
    let dir = manifest.parent().unwrap_or(Path::new("/"));
    Ok(dir.parent().unwrap_or(dir).to_path_buf())
}
