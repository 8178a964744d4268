//! Pluggable request transports.
//!
//! Every Helix call goes through the [`Transport`] trait so the client is
//! indifferent to how the bytes are fetched. Two implementations exist:
//! [`HttpTransport`] (in-process reqwest with rustls) and [`CurlTransport`]
//! (an external `curl` invocation with equivalent headers). Both attach the
//! same `Client-Id` and `Authorization: Bearer` headers and return the raw
//! response body, so they are interchangeable per request.

mod curl;
mod http;

pub use curl::CurlTransport;
pub use http::HttpTransport;

use async_trait::async_trait;

use crate::Result;

/// Credentials attached to every Helix request.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Application client id (`Client-Id` header).
    pub client_id: String,
    /// OAuth bearer token (`Authorization` header).
    pub token: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            token: token.into(),
        }
    }
}

/// A way to issue an authenticated GET request.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the given URL and return the raw response body.
    ///
    /// A non-success HTTP status is an error; callers never see partial
    /// bodies for failed requests.
    async fn get(&self, url: &str) -> Result<String>;
}
