//! In-process HTTP transport backed by reqwest.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

use super::{Credentials, Transport};
use crate::Result;

/// Default request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Transport that performs requests with a shared [`reqwest::Client`].
///
/// Credentials are installed as default headers at construction, so every
/// request carries them without further plumbing.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with its own client.
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Client-Id", HeaderValue::from_str(&credentials.client_id)?);

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", credentials.token))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        debug!(url, "dispatching GET");
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
