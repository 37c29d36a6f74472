use std::path::{Path, PathBuf};
use std::sync::Arc;

use imgsync_cache::LocalCache;
use imgsync_fs::TempPath;
use imgsync_manifest::{Artifact, Hook};
use imgsync_store::{HookResult, ObjectStore, format_duration};
use tracing::{info, warn};

use crate::runner::HookRunner;
use crate::{HookRun, Result};

/// Result of a transform chain: the rewritten working copy, deleted on drop.
#[derive(Debug)]
pub struct TransformOutput {
    path: TempPath,
}

impl TransformOutput {
    pub fn path(&self) -> &Path { &self.path }

    pub fn into_temp_path(self) -> TempPath { self.path }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// A stored passing verdict for the same identity made the run unnecessary.
    Cached,
    Passed,
}

/// What the pre-upload chain did, per hook in manifest order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreUploadReport {
    pub verdicts: Vec<(String, Verdict)>,
}

impl PreUploadReport {
    pub fn executed(&self) -> impl Iterator<Item = &str> {
        self.verdicts
            .iter()
            .filter(|(_, v)| *v == Verdict::Passed)
            .map(|(name, _)| name.as_str())
    }

    pub fn cached(&self) -> impl Iterator<Item = &str> {
        self.verdicts
            .iter()
            .filter(|(_, v)| *v == Verdict::Cached)
            .map(|(name, _)| name.as_str())
    }
}

/// Runs an artifact's transform and pre-upload hooks.
///
/// With a store, pre-upload verdicts are looked up before and recorded after
/// every run. With a cache, each hook gets a scratch directory.
pub struct HookExecutor<S> {
    store:            Option<Arc<S>>,
    cache:            Option<LocalCache>,
    persist_verdicts: bool,
    echo:             bool,
}

impl<S> Default for HookExecutor<S> {
    fn default() -> Self {
        Self {
            store:            None,
            cache:            None,
            persist_verdicts: true,
            echo:             true,
        }
    }
}

impl<S: ObjectStore> HookExecutor<S> {
    pub fn new() -> Self { Self::default() }

    pub fn with_store(mut self, store: Arc<S>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_cache(mut self, cache: Option<LocalCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Consult stored verdicts but never write new ones.
    pub fn read_only(mut self) -> Self {
        self.persist_verdicts = false;
        self
    }

    /// Stop echoing hook output to stdout.
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    fn scratch_dir(&self, hook: &Hook) -> Option<PathBuf> {
        let cache = self.cache.as_ref()?;
        match cache.hook_dir(&hook.name) {
            Ok(dir) => Some(dir),
            Err(e) => {
                warn!(hook = %hook.name, error = %e, "failed to create hook scratch directory");
                None
            }
        }
    }

    fn warn_scratch_collisions(&self, artifact: &Artifact) {
        if self.cache.is_none() {
            return;
        }
        for (dir, names) in artifact.scratch_collisions() {
            warn!(
                artifact = %artifact.name,
                scratch = %dir,
                hooks = ?names,
                "hooks share a scratch directory"
            );
        }
    }

    async fn run(&self, hook: &Hook, file: &Path) -> Result<HookRun> {
        HookRunner::new(hook)
            .scratch_dir(self.scratch_dir(hook))
            .echo(self.echo)
            .run(file)
            .await
    }

    /// Rewrite a private copy of `input` through every transform hook in
    /// order. Returns `None` when the artifact declares none; `input` itself
    /// is never modified.
    pub async fn run_transform_chain(
        &self,
        artifact: &Artifact,
        input: &Path,
    ) -> Result<Option<TransformOutput>> {
        let hooks = &artifact.hooks.transform;
        if hooks.is_empty() {
            return Ok(None);
        }
        self.warn_scratch_collisions(artifact);

        let src = input.to_path_buf();
        let path = tokio::task::spawn_blocking(move || imgsync_fs::working_copy(&src, "transform"))
            .await??;
        let output = TransformOutput { path };

        for hook in hooks {
            info!(artifact = %artifact.name, hook = %hook.name, "running transform hook");
            let run = self.run(hook, output.path()).await?.into_result(&hook.name)?;
            info!(
                hook = %hook.name,
                elapsed = %format_duration(run.duration),
                "transform hook completed"
            );
        }

        Ok(Some(output))
    }

    /// Gate `file` on every pre-upload hook. The first failing hook aborts
    /// the chain.
    pub async fn run_pre_upload_chain(
        &self,
        artifact: &Artifact,
        file: &Path,
        identity: &str,
    ) -> Result<PreUploadReport> {
        let mut report = PreUploadReport::default();
        if artifact.hooks.pre_upload.is_empty() {
            return Ok(report);
        }
        self.warn_scratch_collisions(artifact);

        for hook in &artifact.hooks.pre_upload {
            let verdict = self
                .run_gate(&artifact.destination, hook, file, identity)
                .await?;
            report.verdicts.push((hook.name.clone(), verdict));
        }
        Ok(report)
    }

    async fn run_gate(
        &self,
        destination: &str,
        hook: &Hook,
        file: &Path,
        identity: &str,
    ) -> Result<Verdict> {
        if let Some(store) = &self.store {
            match store.get_hook_result(destination, &hook.name).await {
                Ok(Some(cached)) if cached.covers(identity) => {
                    info!(
                        hook = %hook.name,
                        tested_at = %cached.executed_at.to_rfc3339(),
                        "cached pass"
                    );
                    return Ok(Verdict::Cached);
                }
                Ok(_) => {}
                Err(e) => warn!(hook = %hook.name, error = %e, "failed to look up hook verdict"),
            }
        }

        info!(hook = %hook.name, "running pre-upload hook");
        let run = self.run(hook, file).await?;

        let result = HookResult {
            hook_name:   hook.name.clone(),
            checksum:    identity.to_string(),
            passed:      run.passed(),
            executed_at: run.started_at,
            duration:    format_duration(run.duration),
            output:      run.output.clone(),
        };
        if let (Some(store), true) = (&self.store, self.persist_verdicts) {
            if let Err(e) = store.put_hook_result(destination, &hook.name, &result).await {
                warn!(hook = %hook.name, error = %e, "failed to store hook verdict");
            }
        }

        let run = run.into_result(&hook.name)?;
        info!(
            hook = %hook.name,
            elapsed = %format_duration(run.duration),
            "pre-upload hook passed"
        );
        Ok(Verdict::Passed)
    }
}
