//! Serde models for the Helix endpoints this client touches.
//!
//! Helix wraps every payload in a `data` array. Fields the client does not
//! consume are left out; serde ignores unknown fields by default.

use serde::Deserialize;

/// Envelope shared by all Helix responses.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
}

/// One record from `GET /helix/users`.
#[derive(Debug, Deserialize)]
pub struct User {
    /// Opaque numeric id, as a string.
    pub id: String,
    /// Login name, already lowercase on the Twitch side.
    pub login: String,
}

/// One record from `GET /helix/streams`.
///
/// The endpoint only returns channels that are currently live, so the
/// presence of a record is itself the liveness signal.
#[derive(Debug, Deserialize)]
pub struct Stream {
    pub user_id: String,
    pub user_login: String,
    /// `"live"` for ordinary broadcasts; may be empty during error states.
    #[serde(rename = "type", default)]
    pub stream_type: String,
}
