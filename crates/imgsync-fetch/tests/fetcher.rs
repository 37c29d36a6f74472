use std::sync::Mutex;

use bytes::Bytes;
use futures_util::stream;
use imgsync_fetch::{FetchError, Fetcher, HttpClient, Request, Response, USER_AGENT};
use imgsync_verify::Checksum;

#[derive(Debug, thiserror::Error)]
#[error("connection reset")]
struct Reset;

/// Serves fixed chunks with a fixed status, recording requests.
struct Scripted {
    status:   u16,
    chunks:   Vec<Result<&'static [u8], ()>>,
    requests: Mutex<Vec<Request>>,
}

impl Scripted {
    fn ok(chunks: &[&'static [u8]]) -> Self {
        Self {
            status:   200,
            chunks:   chunks.iter().map(|c| Ok(*c)).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl HttpClient for Scripted {
    type Error = Reset;

    async fn send(&self, request: Request) -> Result<Response<Reset>, Reset> {
        self.requests.lock().unwrap().push(request);
        let items: Vec<Result<Bytes, Reset>> = self
            .chunks
            .iter()
            .map(|c| (*c).map(Bytes::from_static).map_err(|()| Reset))
            .collect();
        Ok(Response {
            status:         self.status,
            content_length: None,
            body:           Box::pin(stream::iter(items)),
        })
    }
}

const HELLO_WORLD: &str =
    "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

#[tokio::test]
async fn downloads_and_verifies_chunks() {
    let fetcher = Fetcher::new(Scripted::ok(&[b"hello ", b"world"]));
    let expected = Checksum::parse(HELLO_WORLD).unwrap();

    let download = fetcher.download("https://example.com/a", &expected).await.unwrap();
    assert_eq!(download.size, 11);
    assert_eq!(std::fs::read(download.file.path()).unwrap(), b"hello world");

    let requests = fetcher.client().requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.contains(&("User-Agent".to_string(), USER_AGENT.to_string())));
}

#[tokio::test]
async fn mismatch_discards_file() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = Fetcher::new(Scripted::ok(&[b"tampered"])).temp_dir(dir.path());
    let expected = Checksum::parse(HELLO_WORLD).unwrap();

    let err = fetcher.download("https://example.com/a", &expected).await.unwrap_err();
    assert!(err.is_checksum_mismatch());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let mut client = Scripted::ok(&[b"not found"]);
    client.status = 404;
    let fetcher = Fetcher::new(client);
    let expected = Checksum::parse(HELLO_WORLD).unwrap();

    let err = fetcher.download("https://example.com/a", &expected).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn broken_stream_is_network_error() {
    let client = Scripted {
        status:   200,
        chunks:   vec![Ok(b"hello "), Err(())],
        requests: Mutex::new(Vec::new()),
    };
    let fetcher = Fetcher::new(client);
    let expected = Checksum::parse(HELLO_WORLD).unwrap();

    let err = fetcher.download("https://example.com/a", &expected).await.unwrap_err();
    assert!(matches!(err, FetchError::Network { ref message, .. } if message == "connection reset"));
}
