use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use imgsync_cache::LocalCache;
use imgsync_fetch::{ReqwestClient, USER_AGENT};
use imgsync_manifest::Manifest;
use imgsync_store::{FsStore, MemoryStore, ObjectStore};
use imgsync_sync::{SyncOptions, Syncer};
use tracing::{info, warn};

use super::{DEFAULT_MANIFEST, default_base_dir, load_manifest};
use crate::github;

#[derive(Args, Clone, Debug)]
pub struct SyncArgs {
    /// Path to the artifact manifest
    #[arg(long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// Root directory of the object store
    #[arg(long, env = "IMGSYNC_STORE_DIR")]
    pub store_dir: Option<PathBuf>,

    /// Local cache directory for downloads and hook scratch space
    #[arg(long, env = "IMGSYNC_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Directory for in-flight downloads and decoded files [default: system temp dir]
    #[arg(long, env = "IMGSYNC_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Directory hook input globs resolve against [default: parent of the manifest's directory]
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Show what would be done without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Re-upload even if the published identity matches
    #[arg(long)]
    pub force: bool,

    /// Skip pre-upload hooks
    #[arg(long)]
    pub skip_hooks: bool,

    /// Skip transform hooks; artifacts that declare any are not uploaded
    #[arg(long)]
    pub skip_transform_hooks: bool,

    /// Download and run hooks but skip the upload
    #[arg(long)]
    pub no_upload: bool,
}

impl SyncArgs {
    fn options(&self) -> Result<SyncOptions> {
        let base_dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None => default_base_dir(&self.manifest)?,
        };
        Ok(SyncOptions {
            dry_run: self.dry_run,
            force: self.force,
            no_upload: self.no_upload,
            skip_hooks: self.skip_hooks,
            skip_transform_hooks: self.skip_transform_hooks,
            base_dir,
        })
    }
}

pub async fn run(args: SyncArgs) -> Result<()> {
    let manifest = load_manifest(&args.manifest)?;
    info!(
        manifest = %args.manifest.display(),
        artifacts = manifest.artifacts().len(),
        "syncing artifacts"
    );

    let cache = match &args.cache_dir {
        Some(dir) => {
            let cache = LocalCache::open(dir)
                .with_context(|| format!("open cache directory '{}'", dir.display()))?;
            info!(cache = %dir.display(), "using local cache");
            Some(cache)
        }
        None => None,
    };
    let options = args.options()?;

    let temp_dir = args.temp_dir.clone();
    let changed = match &args.store_dir {
        Some(dir) => sync_into(&manifest, Arc::new(FsStore::new(dir)), cache, temp_dir, options).await?,
        None if args.dry_run || args.no_upload => {
            sync_into(&manifest, Arc::new(MemoryStore::new()), cache, temp_dir, options).await?
        }
        None => bail!("--store-dir (or IMGSYNC_STORE_DIR) is required unless --dry-run or --no-upload is set"),
    };

    record_changed(github::output_path().as_deref(), changed);
    info!(changed, "sync complete");
    Ok(())
}

/// Publish `files_changed`. Failing to do so never fails the sync.
fn record_changed(output: Option<&Path>, changed: bool) {
    let Some(path) = output else {
        info!("GITHUB_OUTPUT not set, not writing files_changed");
        return;
    };
    if let Err(e) = github::append_output(path, "files_changed", &changed.to_string()) {
        warn!(error = %format!("{e:#}"), "failed to write files_changed output");
    }
}

async fn sync_into<S: ObjectStore>(
    manifest: &Manifest,
    store: Arc<S>,
    cache: Option<LocalCache>,
    temp_dir: Option<PathBuf>,
    options: SyncOptions,
) -> Result<bool> {
    let client = ReqwestClient::new(USER_AGENT).context("build HTTP client")?;
    let syncer = Syncer::new(client, store)
        .with_cache(cache)
        .with_temp_dir(temp_dir)
        .with_options(options);
    let summary = syncer.sync_all(manifest.artifacts()).await?;
    for report in &summary.reports {
        info!(artifact = %report.name, outcome = ?report.outcome, changed = report.changed, "synced");
    }
    Ok(summary.changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_flag_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "").unwrap();

        record_changed(Some(&path), true);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "files_changed=true\n");
    }

    #[test]
    fn unwritable_output_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        record_changed(Some(&dir.path().join("absent").join("output")), false);
        record_changed(None, false);
    }
}
