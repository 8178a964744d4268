//! Batched Twitch Helix API client.
//!
//! Resolves a list of channel logins to the subset currently live using two
//! chained lookups: `GET /helix/users` (logins to ids) and
//! `GET /helix/streams` (ids to live logins), each chunked at the API's
//! 100-items-per-request limit. Requests go through a pluggable
//! [`Transport`] so the same client works in-process (reqwest) or through
//! an external fetch command (curl).

mod client;
mod error;
pub mod models;
pub mod transport;

pub use client::{API_BASE_URL, HelixClient, MAX_PER_REQUEST};
pub use error::{Error, Result};
pub use transport::{Credentials, CurlTransport, HttpTransport, Transport};
