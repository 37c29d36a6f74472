use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

use crate::error::io_err;
use crate::key::{check_key, hook_result_key, metadata_key};
use crate::{ArtifactMetadata, HookResult, ObjectStore, Result, StoreError};

/// Object store backed by a local directory, one file per key.
///
/// Objects and records are written to a sibling temporary file and renamed
/// into place, so readers never observe a partial object.
#[derive(Clone, Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    /// Filesystem path of `key`.
    pub fn path_of(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |p, part| p.join(part)))
    }

    async fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_err(parent, e))?;
        }
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_of(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(path, e)),
        }
    }

    async fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_of(key)?;
        let data = serde_json::to_vec_pretty(value)?;
        Self::ensure_parent(&path).await?;
        tokio::task::spawn_blocking(move || imgsync_fs::atomic_write(&path, &data))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))??;
        Ok(())
    }
}

impl ObjectStore for FsStore {
    async fn checksum_matches(&self, destination: &str, identity: &str) -> Result<bool> {
        Ok(self
            .get_metadata(destination)
            .await?
            .is_some_and(|meta| meta.checksum == identity))
    }

    async fn upload<R>(&self, destination: &str, mut reader: R, size: u64) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let path = self.path_of(destination)?;
        Self::ensure_parent(&path).await?;

        let dir = path.parent().unwrap_or(&self.root).to_path_buf();
        let staged = imgsync_fs::temp_file_in(&dir, "upload")?;
        let std_file = staged.reopen().map_err(|e| io_err(staged.path(), e))?;
        let mut file = tokio::fs::File::from_std(std_file);

        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| io_err(staged.path(), e))?;
        file.flush().await.map_err(|e| io_err(staged.path(), e))?;
        file.sync_all().await.map_err(|e| io_err(staged.path(), e))?;
        drop(file);

        if written != size {
            return Err(StoreError::SizeMismatch {
                key:      destination.to_string(),
                expected: size,
                actual:   written,
            });
        }

        staged
            .persist(&path)
            .map_err(|e| io_err(&path, e.error))?;
        debug!(key = destination, bytes = written, "stored object");
        Ok(())
    }

    async fn put_metadata(&self, destination: &str, metadata: &ArtifactMetadata) -> Result<()> {
        self.write_json(&metadata_key(destination), metadata).await
    }

    async fn get_metadata(&self, destination: &str) -> Result<Option<ArtifactMetadata>> {
        self.read_json(&metadata_key(destination)).await
    }

    async fn get_hook_result(&self, destination: &str, hook_name: &str) -> Result<Option<HookResult>> {
        self.read_json(&hook_result_key(destination, hook_name)).await
    }

    async fn put_hook_result(
        &self,
        destination: &str,
        hook_name: &str,
        result: &HookResult,
    ) -> Result<()> {
        self.write_json(&hook_result_key(destination, hook_name), result).await
    }
}
