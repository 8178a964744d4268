//! Runtime configuration.
//!
//! Settings are assembled once at startup from CLI flags and environment
//! variables and treated as an immutable snapshot afterwards; each poll
//! cycle reads from the same snapshot.

pub mod watchlist;

use std::sync::Arc;
use std::time::Duration;

use helix_client::{Credentials, CurlTransport, HttpTransport, Transport};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Which transport performs Helix requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// In-process HTTP client (rustls).
    #[default]
    Http,
    /// External `curl` subprocess with equivalent headers.
    Curl,
}

/// Immutable runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Space-separated channel logins to watch.
    pub channels: String,
    /// Helix application client id.
    pub client_id: String,
    /// OAuth bearer token.
    pub token: String,
    /// Time between poll cycles.
    pub poll_interval: Duration,
    /// Transport used for Helix requests.
    pub transport: TransportKind,
    /// Optional webhook to POST transition events to.
    pub webhook_url: Option<String>,
}

impl Settings {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::config("client id must not be empty"));
        }
        if self.token.trim().is_empty() {
            return Err(Error::config("bearer token must not be empty"));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::config("poll interval must be non-zero"));
        }
        Ok(())
    }

    /// The normalized watchlist for one cycle.
    pub fn watchlist(&self) -> Vec<String> {
        watchlist::parse(&self.channels)
    }

    /// Build the configured transport.
    pub fn build_transport(&self) -> Result<Arc<dyn Transport>> {
        let credentials = Credentials::new(self.client_id.clone(), self.token.clone());
        Ok(match self.transport {
            TransportKind::Http => Arc::new(HttpTransport::new(&credentials)?),
            TransportKind::Curl => Arc::new(CurlTransport::new(credentials)),
        })
    }
}
