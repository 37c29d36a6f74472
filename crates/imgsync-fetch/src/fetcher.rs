use std::path::PathBuf;
use std::time::Instant;

use futures_util::StreamExt;
use imgsync_fs::NamedTempFile;
use imgsync_verify::{Checksum, Hasher};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::http::{HttpClient, Request};
use crate::{FetchError, Result};

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("imgsync/", env!("CARGO_PKG_VERSION"));

/// A verified download held in a temporary file, deleted on drop.
#[derive(Debug)]
pub struct Download {
    pub file: NamedTempFile,
    pub size: u64,
}

/// Downloads artifacts over HTTP, hashing bytes as they arrive.
pub struct Fetcher<C: HttpClient> {
    client:   C,
    temp_dir: Option<PathBuf>,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            temp_dir: None,
        }
    }

    /// Stage downloads in `dir` instead of the system temp directory.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn client(&self) -> &C { &self.client }

    /// Download `url` into a temporary file and verify it against `expected`.
    ///
    /// Any non-2xx status, transport error or digest mismatch is an error and
    /// the temporary file is removed.
    pub async fn download(&self, url: &str, expected: &Checksum) -> Result<Download> {
        let started = Instant::now();
        let network = |e: C::Error| FetchError::Network {
            url:     url.to_string(),
            message: e.to_string(),
        };

        let request = Request::get(url).header("User-Agent", USER_AGENT);
        let response = self.client.send(request).await.map_err(network)?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url:    url.to_string(),
                status: response.status,
            });
        }
        debug!(url, content_length = ?response.content_length, "download started");

        let staged = match &self.temp_dir {
            Some(dir) => imgsync_fs::temp_file_in(dir, "download")?,
            None => imgsync_fs::temp_file("download")?,
        };
        let write_err = |source| FetchError::Write {
            path: staged.path().to_path_buf(),
            source,
        };
        let mut file = tokio::fs::File::from_std(staged.reopen().map_err(write_err)?);

        let mut hasher = expected.hasher();
        let mut size = 0u64;
        let mut body = response.body;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(network)?;
            hasher.update(&chunk);
            file.write_all(&chunk).await.map_err(write_err)?;
            size += chunk.len() as u64;
        }
        file.flush().await.map_err(write_err)?;
        drop(file);

        expected
            .check(&hasher.finalize())
            .map_err(|source| FetchError::Verify {
                url: url.to_string(),
                source,
            })?;

        info!(
            url,
            bytes = size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "download verified"
        );
        Ok(Download { file: staged, size })
    }
}
