use std::future::Future;

use tokio::io::AsyncRead;

use crate::{ArtifactMetadata, HookResult, Result};

/// Remote storage the sync pipeline publishes into.
///
/// Keys are `/`-separated destination paths from the manifest. Every
/// operation is independent; there are no cross-call transactions.
pub trait ObjectStore: Send + Sync {
    /// Whether `destination` already holds an upload recorded under `identity`.
    fn checksum_matches(
        &self,
        destination: &str,
        identity: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Stream `size` bytes from `reader` into `destination`, replacing any
    /// previous object.
    fn upload<R>(
        &self,
        destination: &str,
        reader: R,
        size: u64,
    ) -> impl Future<Output = Result<()>> + Send
    where
        R: AsyncRead + Unpin + Send;

    fn put_metadata(
        &self,
        destination: &str,
        metadata: &ArtifactMetadata,
    ) -> impl Future<Output = Result<()>> + Send;

    fn get_metadata(
        &self,
        destination: &str,
    ) -> impl Future<Output = Result<Option<ArtifactMetadata>>> + Send;

    fn get_hook_result(
        &self,
        destination: &str,
        hook_name: &str,
    ) -> impl Future<Output = Result<Option<HookResult>>> + Send;

    fn put_hook_result(
        &self,
        destination: &str,
        hook_name: &str,
        result: &HookResult,
    ) -> impl Future<Output = Result<()>> + Send;
}
