use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub url:     String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url:     url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

pub struct Response<E> {
    pub status:         u16,
    pub content_length: Option<u64>,
    pub body:           BoxStream<'static, std::result::Result<Bytes, E>>,
}

impl<E> Response<E> {
    pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations follow redirects themselves and report the final status;
/// callers decide what counts as success.
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(
        &self,
        request: Request,
    ) -> impl Future<Output = std::result::Result<Response<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use futures_util::StreamExt;

    use super::*;

    /// Production HTTP client implementation using reqwest.
    #[derive(Clone, Debug)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder().user_agent(user_agent).build()?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn send(&self, request: Request) -> Result<Response<Self::Error>, Self::Error> {
            let mut builder = self.client.get(&request.url);
            for (key, value) in &request.headers {
                builder = builder.header(key, value);
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let content_length = response.content_length();
            let body = response.bytes_stream().map(|chunk| chunk.map(Bytes::from));

            Ok(Response {
                status,
                content_length,
                body: Box::pin(body),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
