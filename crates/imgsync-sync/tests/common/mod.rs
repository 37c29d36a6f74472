#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use futures_util::stream;
use imgsync_fetch::{HttpClient, Request, Response};
use imgsync_manifest::{Artifact, Hooks, Source, Validation};
use imgsync_verify::Sha256Hasher;

#[derive(Debug, thiserror::Error)]
#[error("no route to {0}")]
pub struct NoRoute(String);

/// Serves canned bodies by URL and counts requests.
#[derive(Default)]
pub struct FakeHttp {
    bodies:   Mutex<HashMap<String, Vec<u8>>>,
    requests: AtomicUsize,
}

impl FakeHttp {
    pub fn new() -> Self { Self::default() }

    pub fn serve(self, url: &str, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.lock().unwrap().insert(url.to_string(), body.into());
        self
    }

    pub fn requests(&self) -> usize { self.requests.load(Ordering::SeqCst) }
}

impl HttpClient for FakeHttp {
    type Error = NoRoute;

    async fn send(&self, request: Request) -> Result<Response<NoRoute>, NoRoute> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let body = self.bodies.lock().unwrap().get(&request.url).cloned();
        let (status, body) = match body {
            Some(body) => (200, body),
            None => (404, Vec::new()),
        };
        let chunks: Vec<Result<Bytes, NoRoute>> = body
            .chunks(7)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Ok(Response {
            status,
            content_length: None,
            body: Box::pin(stream::iter(chunks)),
        })
    }
}

pub fn sha256(data: &[u8]) -> String { format!("sha256:{}", hex::encode(Sha256Hasher::digest(data))) }

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn artifact(name: &str, url: &str, body: &[u8]) -> Artifact {
    Artifact {
        name:        name.to_string(),
        source:      Source {
            url:        url.to_string(),
            checksum:   sha256(body),
            decompress: None,
        },
        destination: format!("images/{name}.img"),
        validation:  None,
        hooks:       Hooks::default(),
    }
}

pub fn compressed_artifact(name: &str, url: &str, plain: &[u8]) -> (Artifact, Vec<u8>) {
    let packed = gzip(plain);
    let mut a = artifact(name, url, &packed);
    a.source.decompress = Some("gzip".to_string());
    a.validation = Some(Validation {
        algorithm: "sha256".to_string(),
        expected:  sha256(plain),
    });
    (a, packed)
}
