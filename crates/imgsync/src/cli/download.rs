use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use imgsync_fetch::{ReqwestClient, USER_AGENT};
use imgsync_store::MemoryStore;
use imgsync_sync::Syncer;

use super::{DEFAULT_MANIFEST, load_manifest};

#[derive(Args, Clone, Debug)]
pub struct DownloadArgs {
    /// Artifact name to download
    #[arg(long)]
    pub name: String,

    /// Output file path
    #[arg(long, short)]
    pub output: PathBuf,

    /// Directory for in-flight downloads and decoded files [default: system temp dir]
    #[arg(long, env = "IMGSYNC_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Path to the artifact manifest
    #[arg(long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,
}

pub async fn run(args: DownloadArgs) -> Result<()> {
    let manifest = load_manifest(&args.manifest)?;
    let artifact = manifest
        .find(&args.name)
        .with_context(|| format!("artifact '{}' not found in manifest", args.name))?;

    let client = ReqwestClient::new(USER_AGENT).context("build HTTP client")?;
    let syncer = Syncer::new(client, Arc::new(MemoryStore::new())).with_temp_dir(args.temp_dir);
    let result = syncer.download_artifact(artifact, &args.output).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
