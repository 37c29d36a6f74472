//! HTTP download for artifact sources.
//!
//! [`Fetcher`] streams a response body into a temporary file while hashing
//! it, so a download is either verified against its declared checksum or
//! discarded. The transport is pluggable through [`HttpClient`]; the
//! `reqwest` feature provides [`ReqwestClient`].

pub use error::{FetchError, Result};
pub use fetcher::{Download, Fetcher, USER_AGENT};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use http::{BoxStream, HttpClient, Request, Response};

mod error;
mod fetcher;
mod http;
