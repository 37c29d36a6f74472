use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{ArtifactMetadata, HookResult, ObjectStore, Result, StoreError};

#[derive(Default)]
struct State {
    objects:  HashMap<String, Vec<u8>>,
    metadata: HashMap<String, ArtifactMetadata>,
    verdicts: HashMap<(String, String), HookResult>,
}

/// In-process store for tests and dry runs. Counts writes so callers can
/// assert which side effects happened.
#[derive(Default)]
pub struct MemoryStore {
    state:              Mutex<State>,
    uploads:            AtomicUsize,
    verdict_writes:     AtomicUsize,
    fail_verdict_reads: AtomicBool,
    fail_uploads:       AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn upload_count(&self) -> usize { self.uploads.load(Ordering::SeqCst) }

    pub fn verdict_write_count(&self) -> usize { self.verdict_writes.load(Ordering::SeqCst) }

    pub fn object(&self, destination: &str) -> Option<Vec<u8>> {
        self.state().objects.get(destination).cloned()
    }

    pub fn metadata(&self, destination: &str) -> Option<ArtifactMetadata> {
        self.state().metadata.get(destination).cloned()
    }

    pub fn verdict(&self, destination: &str, hook_name: &str) -> Option<HookResult> {
        self.state()
            .verdicts
            .get(&(destination.to_string(), hook_name.to_string()))
            .cloned()
    }

    /// Seed a metadata record without counting it as an upload.
    pub fn insert_metadata(&self, destination: &str, metadata: ArtifactMetadata) {
        self.state().metadata.insert(destination.to_string(), metadata);
    }

    /// Seed a verdict without counting it as a write.
    pub fn insert_verdict(&self, destination: &str, result: HookResult) {
        self.state()
            .verdicts
            .insert((destination.to_string(), result.hook_name.clone()), result);
    }

    /// Make every subsequent verdict lookup fail.
    pub fn fail_verdict_reads(&self, fail: bool) { self.fail_verdict_reads.store(fail, Ordering::SeqCst); }

    /// Make every subsequent upload fail after its body is read.
    pub fn fail_uploads(&self, fail: bool) { self.fail_uploads.store(fail, Ordering::SeqCst); }
}

impl ObjectStore for MemoryStore {
    async fn checksum_matches(&self, destination: &str, identity: &str) -> Result<bool> {
        Ok(self
            .state()
            .metadata
            .get(destination)
            .is_some_and(|meta| meta.checksum == identity))
    }

    async fn upload<R>(&self, destination: &str, mut reader: R, size: u64) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut data = Vec::new();
        reader
            .read_to_end(&mut data)
            .await
            .map_err(|e| crate::error::io_err(destination, e))?;
        if data.len() as u64 != size {
            return Err(StoreError::SizeMismatch {
                key:      destination.to_string(),
                expected: size,
                actual:   data.len() as u64,
            });
        }
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("upload disabled".to_string()));
        }
        self.state().objects.insert(destination.to_string(), data);
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn put_metadata(&self, destination: &str, metadata: &ArtifactMetadata) -> Result<()> {
        self.state()
            .metadata
            .insert(destination.to_string(), metadata.clone());
        Ok(())
    }

    async fn get_metadata(&self, destination: &str) -> Result<Option<ArtifactMetadata>> {
        Ok(self.metadata(destination))
    }

    async fn get_hook_result(&self, destination: &str, hook_name: &str) -> Result<Option<HookResult>> {
        if self.fail_verdict_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("verdict lookup disabled".to_string()));
        }
        Ok(self.verdict(destination, hook_name))
    }

    async fn put_hook_result(
        &self,
        destination: &str,
        hook_name: &str,
        result: &HookResult,
    ) -> Result<()> {
        self.state()
            .verdicts
            .insert((destination.to_string(), hook_name.to_string()), result.clone());
        self.verdict_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
