//! Batched two-stage resolution of channel logins to the live subset.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::Result;
use crate::models::{Envelope, Stream, User};
use crate::transport::Transport;

/// Production Helix endpoint.
pub const API_BASE_URL: &str = "https://api.twitch.tv/helix";

/// Helix caps repeated query parameters at 100 per request.
pub const MAX_PER_REQUEST: usize = 100;

/// Client for the two Helix lookups the watcher needs.
///
/// Both lookups chunk their input at [`MAX_PER_REQUEST`] and issue one GET
/// per chunk. A chunk that fails, for any reason, contributes an empty
/// result and the remaining chunks still run; resolution as a whole never
/// fails. There is no retry inside a cycle.
pub struct HelixClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl HelixClient {
    /// Create a client against the production endpoint.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, API_BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests).
    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one chunk of records from `path`, repeating `param` per value.
    async fn fetch_chunk<T: DeserializeOwned>(
        &self,
        path: &str,
        param: &str,
        values: &[String],
    ) -> Result<Vec<T>> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))?;
        url.query_pairs_mut()
            .extend_pairs(values.iter().map(|v| (param, v.as_str())));

        let body = self.transport.get(url.as_str()).await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }

    /// Stage A: resolve logins to opaque user ids.
    ///
    /// Ids come back in chunk-processing order. Logins unknown to the
    /// platform are simply absent from the response.
    pub async fn resolve_user_ids(&self, logins: &[String]) -> Vec<String> {
        let mut ids = Vec::with_capacity(logins.len());

        for chunk in logins.chunks(MAX_PER_REQUEST) {
            match self.fetch_chunk::<User>("users", "login", chunk).await {
                Ok(users) => ids.extend(users.into_iter().map(|u| u.id)),
                Err(e) => warn!(
                    chunk_len = chunk.len(),
                    error = %e,
                    "user id lookup failed, skipping chunk"
                ),
            }
        }

        debug!(requested = logins.len(), resolved = ids.len(), "resolved user ids");
        ids
    }

    /// Stage B: resolve user ids to the logins currently live.
    ///
    /// Logins are lower-cased at ingestion so downstream comparisons stay
    /// case-insensitive even if the platform changes display casing.
    pub async fn live_logins(&self, ids: &[String]) -> Vec<String> {
        let mut logins = Vec::new();

        for chunk in ids.chunks(MAX_PER_REQUEST) {
            match self.fetch_chunk::<Stream>("streams", "user_id", chunk).await {
                Ok(streams) => {
                    logins.extend(streams.into_iter().map(|s| s.user_login.to_lowercase()))
                }
                Err(e) => warn!(
                    chunk_len = chunk.len(),
                    error = %e,
                    "live status lookup failed, skipping chunk"
                ),
            }
        }

        logins
    }

    /// Full resolution: configured logins in, currently-live logins out.
    pub async fn live_channels(&self, logins: &[String]) -> Vec<String> {
        if logins.is_empty() {
            return Vec::new();
        }

        let ids = self.resolve_user_ids(logins).await;
        if ids.is_empty() {
            return Vec::new();
        }

        self.live_logins(&ids).await
    }
}
