use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use imgsync_cache::LocalCache;
use imgsync_decompress::{Compression, DecompressOptions};
use imgsync_fetch::{Fetcher, HttpClient};
use imgsync_fs::StagedFile;
use imgsync_hooks::HookExecutor;
use imgsync_manifest::Artifact;
use imgsync_store::{ArtifactMetadata, ObjectStore, SourceMetadata};
use imgsync_verify::{Checksum, verify_file};
use tracing::{debug, info, warn};

use crate::{DownloadResult, Outcome, Result, Stage, SyncError, SyncOptions, SyncReport, SyncSummary};

/// Where an artifact is in the pipeline. Logged at every transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Start,
    IdentityComputed,
    CacheHit,
    Downloaded,
    Verified,
    Decompressed,
    Raw,
    Transformed,
    PreUploadPassed,
    Uploaded,
    UploadSkipped,
    Done,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Debug::fmt(self, f) }
}

struct Progress<'a> {
    artifact: &'a str,
    state:    State,
}

impl<'a> Progress<'a> {
    fn new(artifact: &'a str) -> Self {
        Self {
            artifact,
            state: State::Start,
        }
    }

    fn advance(&mut self, next: State) {
        debug!(artifact = self.artifact, from = %self.state, to = %next, "state transition");
        self.state = next;
    }
}

/// Drives artifacts from their source to the object store.
///
/// The store is asked first whether the artifact's effective identity is
/// already published; only if not is anything downloaded, hooked or
/// uploaded.
pub struct Syncer<C: HttpClient, S: ObjectStore> {
    fetcher:    Fetcher<C>,
    store:      Arc<S>,
    cache:      Option<LocalCache>,
    decompress: DecompressOptions,
    options:    SyncOptions,
    quiet:      bool,
}

impl<C: HttpClient, S: ObjectStore> Syncer<C, S> {
    pub fn new(client: C, store: Arc<S>) -> Self {
        Self {
            fetcher: Fetcher::new(client),
            store,
            cache: None,
            decompress: DecompressOptions::new(),
            options: SyncOptions::default(),
            quiet: false,
        }
    }

    pub fn with_cache(mut self, cache: Option<LocalCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Stage downloads and decoded files in `dir` instead of the system temp
    /// directory.
    pub fn with_temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.fetcher = self.fetcher.temp_dir(dir.clone());
            self.decompress = self.decompress.temp_dir(dir);
        }
        self
    }

    pub fn with_decompress_options(mut self, options: DecompressOptions) -> Self {
        self.decompress = options;
        self
    }

    /// Do not echo hook output to stdout.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn options(&self) -> &SyncOptions { &self.options }

    pub fn fetcher(&self) -> &Fetcher<C> { &self.fetcher }

    pub fn store(&self) -> &Arc<S> { &self.store }

    fn hook_executor(&self, read_only: bool) -> HookExecutor<S> {
        let mut executor = HookExecutor::new()
            .with_store(self.store.clone())
            .with_cache(self.cache.clone());
        if read_only {
            executor = executor.read_only();
        }
        if self.quiet {
            executor = executor.quiet();
        }
        executor
    }

    /// Sync every artifact in order, stopping at the first failure.
    pub async fn sync_all(&self, artifacts: &[Artifact]) -> Result<SyncSummary> {
        let mut summary = SyncSummary::default();
        for artifact in artifacts {
            let report = self
                .sync_artifact(artifact)
                .await
                .map_err(|e| e.in_artifact(&artifact.name))?;
            summary.push(report);
        }
        Ok(summary)
    }

    pub async fn sync_artifact(&self, artifact: &Artifact) -> Result<SyncReport> {
        let opts = &self.options;
        let mut progress = Progress::new(&artifact.name);
        info!(artifact = %artifact.name, "processing");

        let identity = artifact
            .effective_identity(&opts.base_dir)
            .map_err(SyncError::Identity)?;
        progress.advance(State::IdentityComputed);
        debug!(artifact = %artifact.name, %identity, "effective identity");

        if !opts.dry_run && !opts.force && !opts.no_upload {
            let published = self
                .store
                .checksum_matches(&artifact.destination, &identity)
                .await
                .map_err(SyncError::RemoteCheck)?;
            if published {
                info!(artifact = %artifact.name, "checksum matches existing artifact, skipping");
                progress.advance(State::Done);
                return Ok(SyncReport::new(&artifact.name, identity, Outcome::UpToDate));
            }
        }

        if opts.dry_run {
            info!(
                artifact = %artifact.name,
                url = %artifact.source.url,
                destination = %artifact.destination,
                "dry run: would download and upload"
            );
            progress.advance(State::Done);
            return Ok(SyncReport::new(&artifact.name, identity, Outcome::DryRun));
        }

        let source = Checksum::parse(&artifact.source.checksum)
            .map_err(|e| SyncError::Download(imgsync_fetch::FetchError::Verify {
                url:    artifact.source.url.clone(),
                source: e,
            }))?;
        let mut current = self.acquire(artifact, &source, &mut progress).await?;
        current = self.decompress_if_declared(artifact, current, &mut progress).await?;

        // Untransformed bytes must never be published or vouched for under
        // the transformed identity.
        let untransformed = opts.skip_transform_hooks && !artifact.hooks.transform.is_empty();
        let executor = self.hook_executor(opts.no_upload || untransformed);
        if !artifact.hooks.transform.is_empty() {
            if untransformed {
                info!(artifact = %artifact.name, "skipping transform hooks");
            } else if let Some(output) = executor
                .run_transform_chain(artifact, current.path())
                .await
                .map_err(SyncError::Transform)?
            {
                current = StagedFile::Disposable(output.into_temp_path());
            }
        }
        progress.advance(State::Transformed);

        if !artifact.hooks.pre_upload.is_empty() {
            if opts.skip_hooks {
                info!(artifact = %artifact.name, "skipping pre-upload hooks");
            } else {
                executor
                    .run_pre_upload_chain(artifact, current.path(), &identity)
                    .await
                    .map_err(SyncError::PreUpload)?;
            }
        }
        progress.advance(State::PreUploadPassed);

        if opts.no_upload || untransformed {
            if untransformed {
                info!(artifact = %artifact.name, "transform hooks skipped, not uploading");
            } else {
                info!(artifact = %artifact.name, "upload disabled, not uploading");
            }
            progress.advance(State::UploadSkipped);
            progress.advance(State::Done);
            return Ok(SyncReport::new(&artifact.name, identity, Outcome::UploadSkipped));
        }

        let size = self.upload(artifact, current.path(), &identity).await?;
        progress.advance(State::Uploaded);
        progress.advance(State::Done);
        Ok(SyncReport::new(&artifact.name, identity, Outcome::Uploaded { size }))
    }

    /// A verified copy of the source: a re-verified cache entry, or a fresh
    /// download that is then offered to the cache.
    async fn acquire(
        &self,
        artifact: &Artifact,
        source: &Checksum,
        progress: &mut Progress<'_>,
    ) -> Result<StagedFile> {
        if let Some(path) = self.cached_source(artifact, source).await {
            progress.advance(State::CacheHit);
            progress.advance(State::Verified);
            return Ok(StagedFile::Kept(path));
        }

        info!(artifact = %artifact.name, url = %artifact.source.url, "downloading");
        let download = self
            .fetcher
            .download(&artifact.source.url, source)
            .await
            .map_err(SyncError::Download)?;
        progress.advance(State::Downloaded);
        progress.advance(State::Verified);

        if let Some(cache) = &self.cache {
            let cache = cache.clone();
            let checksum = artifact.source.checksum.clone();
            let path = download.file.path().to_path_buf();
            let stored = tokio::task::spawn_blocking(move || {
                let mut file = File::open(&path).map_err(|e| e.to_string())?;
                cache.put(&checksum, &mut file).map_err(|e| e.to_string())
            })
            .await;
            match stored {
                Ok(Ok(path)) => debug!(artifact = %artifact.name, path = %path.display(), "cached download"),
                Ok(Err(e)) => warn!(artifact = %artifact.name, error = %e, "failed to cache download"),
                Err(e) => warn!(artifact = %artifact.name, error = %e, "failed to cache download"),
            }
        }

        Ok(StagedFile::from(download.file))
    }

    async fn cached_source(&self, artifact: &Artifact, source: &Checksum) -> Option<PathBuf> {
        let cache = self.cache.as_ref()?;
        let path = cache.get(&artifact.source.checksum)?;

        let candidate = path.clone();
        let expected = source.clone();
        let verified = tokio::task::spawn_blocking(move || verify_file(&candidate, &expected)).await;
        let reason = match verified {
            Ok(Ok(_)) => {
                info!(artifact = %artifact.name, path = %path.display(), "using cached download");
                return Some(path);
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };

        warn!(artifact = %artifact.name, error = %reason, "cached download failed verification, discarding");
        if let Err(e) = cache.remove(&artifact.source.checksum) {
            warn!(artifact = %artifact.name, error = %e, "failed to remove cache entry");
        }
        None
    }

    async fn decompress_if_declared(
        &self,
        artifact: &Artifact,
        current: StagedFile,
        progress: &mut Progress<'_>,
    ) -> Result<StagedFile> {
        let Some(format) = &artifact.source.decompress else {
            progress.advance(State::Raw);
            return Ok(current);
        };
        let compression: Compression = format.parse().map_err(SyncError::Decompress)?;

        info!(artifact = %artifact.name, format = %compression, "decompressing");
        let decompressed = decompress_file(current.path(), compression, &self.decompress).await?;
        drop(current);
        progress.advance(State::Decompressed);

        if let Some(expected) = artifact.expected_checksum() {
            let expected = Checksum::parse(expected).map_err(SyncError::Verify)?;
            verify_path(decompressed.path(), expected).await?;
            debug!(artifact = %artifact.name, "decompressed checksum verified");
        }
        Ok(decompressed)
    }

    async fn upload(&self, artifact: &Artifact, path: &Path, identity: &str) -> Result<u64> {
        let file = tokio::fs::File::open(path).await.map_err(|source| {
            SyncError::Upload(imgsync_store::StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let size = file
            .metadata()
            .await
            .map_err(|source| {
                SyncError::Upload(imgsync_store::StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            })?
            .len();

        info!(artifact = %artifact.name, destination = %artifact.destination, bytes = size, "uploading");
        self.store
            .upload(&artifact.destination, file, size)
            .await
            .map_err(SyncError::Upload)?;

        let metadata = ArtifactMetadata {
            name: artifact.name.clone(),
            checksum: identity.to_string(),
            size,
            uploaded_at: Utc::now(),
            source: SourceMetadata::http(&artifact.source.url),
        };
        self.store
            .put_metadata(&artifact.destination, &metadata)
            .await
            .map_err(SyncError::Metadata)?;
        Ok(size)
    }

    /// Download, verify and optionally decompress one artifact into
    /// `output`. No hooks run and nothing is uploaded.
    pub async fn download_artifact(&self, artifact: &Artifact, output: &Path) -> Result<DownloadResult> {
        let source = Checksum::parse(&artifact.source.checksum)
            .map_err(|e| SyncError::Download(imgsync_fetch::FetchError::Verify {
                url:    artifact.source.url.clone(),
                source: e,
            }))?;
        info!(artifact = %artifact.name, url = %artifact.source.url, "downloading");
        let download = self
            .fetcher
            .download(&artifact.source.url, &source)
            .await
            .map_err(SyncError::Download)?;

        let mut progress = Progress::new(&artifact.name);
        let declared = artifact.source.decompress.is_some();
        let current = self
            .decompress_if_declared(artifact, StagedFile::from(download.file), &mut progress)
            .await?;
        let checksum = if declared {
            artifact.base_checksum().to_string()
        } else {
            artifact.source.checksum.clone()
        };

        let src = current.path().to_path_buf();
        let dest = output.to_path_buf();
        let size = tokio::task::spawn_blocking(move || imgsync_fs::atomic_copy_file(&src, &dest))
            .await
            .map_err(|source| SyncError::Task {
                stage: Stage::Output,
                source,
            })?
            .map_err(|source| SyncError::Output {
                path: output.to_path_buf(),
                source,
            })?;
        info!(artifact = %artifact.name, path = %output.display(), bytes = size, "wrote artifact");

        Ok(DownloadResult {
            path: output.to_path_buf(),
            checksum,
            size,
            name: artifact.name.clone(),
        })
    }
}

async fn decompress_file(
    path: &Path,
    compression: Compression,
    options: &DecompressOptions,
) -> Result<StagedFile> {
    let path = path.to_path_buf();
    let options = options.clone();
    let decompressed = tokio::task::spawn_blocking(move || {
        let file = File::open(&path).map_err(|source| {
            imgsync_decompress::Error::Fs(imgsync_fs::Error::Read {
                path: path.clone(),
                source,
            })
        })?;
        imgsync_decompress::decompress(BufReader::new(file), compression, &options)
    })
    .await
    .map_err(|source| SyncError::Task {
        stage: Stage::Decompress,
        source,
    })?
    .map_err(SyncError::Decompress)?;
    Ok(StagedFile::from(decompressed.file))
}

async fn verify_path(path: &Path, expected: Checksum) -> Result<u64> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || verify_file(&path, &expected))
        .await
        .map_err(|source| SyncError::Task {
            stage: Stage::Verify,
            source,
        })?
        .map_err(SyncError::Verify)
}
